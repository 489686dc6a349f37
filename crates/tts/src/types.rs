/// Text submitted to `/api/synthesize`
#[derive(Debug, Clone)]
pub struct SynthesizeRequest {
    /// Non-empty text to speak
    pub text: String,
}

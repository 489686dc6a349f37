use parley_core::{FromJsonObject, Rejection, validate};
use serde_json::{Map, Value};

use crate::types::SynthesizeRequest;

pub(crate) const NO_TEXT: &str = "No text provided";

impl FromJsonObject for SynthesizeRequest {
    fn from_json_object(object: &Map<String, Value>) -> Result<Self, Rejection> {
        let text = validate::required_text(object, "text", NO_TEXT)?;

        Ok(Self { text })
    }
}

use parley_core::{FromJsonObject, Rejection, validate};
use serde_json::{Map, Value};

use crate::types::ChatRequest;

pub(crate) const NO_PROMPT: &str = "No prompt provided";

impl FromJsonObject for ChatRequest {
    fn from_json_object(object: &Map<String, Value>) -> Result<Self, Rejection> {
        let prompt = validate::required_text(object, "prompt", NO_PROMPT)?;

        Ok(Self { prompt })
    }
}

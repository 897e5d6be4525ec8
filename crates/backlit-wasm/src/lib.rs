use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use backlit_core::{HighlightOptions, highlight};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenizeOptions {
    coalescing: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsToken {
    begin: usize,
    length: usize,
    category: String,
}

#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsValue> {
    tokenize_with_options(source, JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn tokenize_with_options(source: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;

    let mut tokens = Vec::new();
    highlight(&mut tokens, source, &options);

    let result: Vec<JsToken> = tokens
        .into_iter()
        .map(|token| JsToken {
            begin: token.begin,
            length: token.length,
            category: token.category.as_str().to_string(),
        })
        .collect();

    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<HighlightOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(HighlightOptions::default());
    }
    let parsed: TokenizeOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let mut out = HighlightOptions::default();
    if let Some(coalescing) = parsed.coalescing {
        out.coalescing = coalescing;
    }
    Ok(out)
}

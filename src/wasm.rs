use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn generate_pdf(json: &str) -> Result<Vec<u8>, JsValue> {
    crate::generate_json(json)
        .map(|document| document.into_bytes())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn document_structure(json: &str) -> Result<String, JsValue> {
    crate::structure_json(json)
        .map(|node| node.to_json_pretty())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

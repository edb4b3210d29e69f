//! WASM bindings for FGD Core.
//!
//! This module provides JavaScript-friendly bindings for browser-based
//! editors and tooling. All structured results cross the boundary as JSON.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { parse_fgd, WasmFgdSchema } from 'fgd_core';
//!
//! await init();
//!
//! const entities = JSON.parse(parse_fgd(fgdText));
//!
//! const schema = new WasmFgdSchema(fgdText);
//! for (const name of schema.classnames()) {
//!   const fields = JSON.parse(schema.fields_json(name));
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::error::FgdError;
use crate::fgd;
use crate::schema::Schema;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: FgdError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Parse FGD text and return its entity classes as a JSON array.
#[wasm_bindgen]
pub fn parse_fgd(text: &str) -> Result<String, JsValue> {
    let document = fgd::parse(text);
    serde_json::to_string(&document.entities).map_err(|e| to_js(e.into()))
}

/// WASM-compatible handle to a parsed schema.
#[wasm_bindgen]
pub struct WasmFgdSchema {
    schema: Schema,
    diagnostics: Vec<String>,
}

#[wasm_bindgen]
impl WasmFgdSchema {
    /// Parse FGD text into a schema.
    ///
    /// # Returns
    /// A new `WasmFgdSchema`, or an error if no entity classes were found.
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Result<WasmFgdSchema, JsValue> {
        let (entities, diagnostics) = fgd::parse(text).into_parts();
        let schema = Schema::from_entities(entities, None).map_err(to_js)?;
        Ok(WasmFgdSchema {
            schema,
            diagnostics: diagnostics.iter().map(ToString::to_string).collect(),
        })
    }

    /// Distinct classnames in order of first appearance.
    #[wasm_bindgen]
    pub fn classnames(&self) -> Vec<String> {
        self.schema
            .class_options()
            .into_iter()
            .map(|o| o.classname)
            .collect()
    }

    /// Editable fields of `classname` as a JSON array.
    #[wasm_bindgen]
    pub fn fields_json(&self, classname: &str) -> Result<String, JsValue> {
        let fields = self.schema.fields_for(classname).map_err(to_js)?;
        serde_json::to_string(&fields).map_err(|e| to_js(e.into()))
    }

    /// Parse diagnostics, one message per entry.
    #[wasm_bindgen(getter)]
    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.clone()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

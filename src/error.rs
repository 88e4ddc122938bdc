use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("{0} not available")]
    Missing(&'static str),

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("invalid value {value:?} for `{key}`")]
    InvalidConfig { key: String, value: String },

    #[error("javascript error: {0}")]
    Js(String),
}

impl DemoError {
    pub(crate) fn invalid(key: &str, value: &str) -> Self {
        DemoError::InvalidConfig {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for DemoError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        DemoError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DemoError> for wasm_bindgen::JsValue {
    fn from(err: DemoError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("SVG input is empty")]
    EmptyInput,

    #[error("No SVG element found in input")]
    NoRootElement,

    #[error("Invalid SVG markup: {0}")]
    MalformedMarkup(String),

    #[error("SVG optimization failed: {0}")]
    OptimizerFailure(String),

    #[error("Code formatting failed: {0}")]
    FormatterFailure(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        ConvertError::MalformedMarkup(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ConvertError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ConvertError::MalformedMarkup(format!("Invalid attribute: {}", err))
    }
}

impl From<std::str::Utf8Error> for ConvertError {
    fn from(err: std::str::Utf8Error) -> Self {
        ConvertError::MalformedMarkup(err.to_string())
    }
}

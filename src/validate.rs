//! Cheap up-front checks plus advisory warnings.

use crate::error::ConvertError;
use crate::parse::{ParseResult, parse_svg};

/// A successfully validated input.
#[derive(Debug, Clone)]
pub struct Validation {
    /// The parse performed while validating, reusable by the caller.
    pub parsed: ParseResult,
    /// Advisory only; never blocks conversion.
    pub warnings: Vec<String>,
}

/// Reject empty or malformed input, and collect warnings for valid input.
pub fn validate(svg: &str) -> Result<Validation, ConvertError> {
    if svg.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    if !svg.contains("<svg") {
        return Err(ConvertError::NoRootElement);
    }

    let parsed = parse_svg(svg)?;
    let warnings = collect_warnings(&parsed);

    Ok(Validation { parsed, warnings })
}

fn collect_warnings(parsed: &ParseResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if parsed.metadata.view_box.is_none() {
        warnings.push("SVG has no viewBox attribute. This may cause scaling issues.".to_string());
    }

    if parsed.metadata.width.is_none() && parsed.metadata.height.is_none() {
        warnings.push("SVG has no width or height attributes.".to_string());
    }

    if parsed.has_gradients {
        warnings.push(
            "SVG contains gradients. Ensure react-native-svg supports your gradient type."
                .to_string(),
        );
    }

    if parsed.has_clip_paths {
        warnings.push(
            "SVG contains clip paths. These may not render identically across platforms."
                .to_string(),
        );
    }

    if parsed.has_transforms {
        warnings.push(
            "SVG contains transform attributes. Consider baking transforms into path data for better compatibility."
                .to_string(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(matches!(validate(""), Err(ConvertError::EmptyInput)));
        assert!(matches!(validate("  \n\t "), Err(ConvertError::EmptyInput)));
    }

    #[test]
    fn test_no_svg_tag() {
        assert!(matches!(
            validate("<html><body/></html>"),
            Err(ConvertError::NoRootElement)
        ));
    }

    #[test]
    fn test_malformed_markup_message_forwarded() {
        match validate(r#"<svg><rect x="0"></svg>"#) {
            Err(ConvertError::MalformedMarkup(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected malformed markup, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_svg_has_no_warnings() {
        let v = validate(r#"<svg width="24" height="24" viewBox="0 0 24 24"><path d="M0 0"/></svg>"#)
            .unwrap();
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn test_warnings() {
        let v = validate(
            r#"<svg><defs><radialGradient id="r"/><clipPath id="c"/></defs><g transform="scale(2)"/></svg>"#,
        )
        .unwrap();
        assert_eq!(v.warnings.len(), 5);
        assert!(v.warnings[0].contains("viewBox"));
        assert!(v.warnings[1].contains("width or height"));
        assert!(v.warnings[2].contains("gradients"));
        assert!(v.warnings[3].contains("clip paths"));
        assert!(v.warnings[4].contains("transform"));
    }
}

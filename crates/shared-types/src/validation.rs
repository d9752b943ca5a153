/// True when the text has no non-whitespace character.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `validator` custom rule rejecting empty or whitespace-only text.
#[cfg(feature = "validation")]
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if is_blank(value) {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Message translation seam. Any `Fn(&str) -> String` is a translator.
pub trait Translator {
    fn translate(&self, message: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, message: &str) -> String {
        self(message)
    }
}

/// Translate a list of messages, or return them unchanged without a translator.
pub fn translate_all(messages: &[String], translator: Option<&dyn Translator>) -> Vec<String> {
    match translator {
        Some(t) => messages.iter().map(|m| t.translate(m)).collect(),
        None => messages.to_vec(),
    }
}

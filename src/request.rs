use reqwest::multipart::Form;

use crate::models::GenerationOptions;

/// Text fields of a `POST /videos` submission, in the order they are sent.
///
/// Kept as plain name/value pairs so the payload can be inspected before it
/// is turned into a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionForm {
    fields: Vec<(&'static str, String)>,
}

impl SubmissionForm {
    /// Assemble the submission fields.
    ///
    /// `model` and `prompt` are always present. `input_reference` is added
    /// only for a non-empty `image_url` (otherwise this is a text-to-video
    /// request), `seconds` only when the effective duration is positive, and
    /// `size` only when a resolution is given. Values are not validated.
    pub fn build(
        image_url: &str,
        prompt: &str,
        opts: &GenerationOptions,
        default_model: &str,
    ) -> Self {
        let mut fields = vec![
            ("model", opts.effective_model(default_model).to_string()),
            ("prompt", prompt.to_string()),
        ];

        if !image_url.is_empty() {
            fields.push(("input_reference", image_url.to_string()));
        }

        let seconds = opts.effective_duration();
        if seconds > 0 {
            fields.push(("seconds", seconds.to_string()));
        }

        if let Some(size) = opts.effective_resolution() {
            fields.push(("size", size.to_string()));
        }

        Self { fields }
    }

    /// All fields as `(name, value)` pairs, in send order.
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Value of the named field, if it was included.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// `true` if the named field will be sent.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Encode as `multipart/form-data`. reqwest generates the boundary and
    /// the matching `Content-Type` header when the form is attached.
    pub fn into_multipart(self) -> Form {
        self.fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(form: &SubmissionForm) -> Vec<&'static str> {
        form.fields().iter().map(|(n, _)| *n).collect()
    }

    #[test]
    fn image_to_video_with_duration() {
        let opts = GenerationOptions::default().with_duration(6);
        let form = SubmissionForm::build("https://x/y.png", "a cat", &opts, "sora-2");

        assert_eq!(form.get("model"), Some("sora-2"));
        assert_eq!(form.get("prompt"), Some("a cat"));
        assert_eq!(form.get("input_reference"), Some("https://x/y.png"));
        assert_eq!(form.get("seconds"), Some("6"));
        assert!(!form.contains("size"));
    }

    #[test]
    fn defaults_send_four_seconds() {
        let form = SubmissionForm::build("", "waves", &GenerationOptions::default(), "sora-2");
        assert_eq!(names(&form), vec!["model", "prompt", "seconds"]);
        assert_eq!(form.get("seconds"), Some("4"));
    }

    #[test]
    fn non_positive_duration_omits_seconds() {
        for secs in [0, -1, -30] {
            let opts = GenerationOptions::default().with_duration(secs);
            let form = SubmissionForm::build("", "waves", &opts, "sora-2");
            assert!(!form.contains("seconds"), "duration {secs} leaked into form");
        }
    }

    #[test]
    fn positive_duration_is_sent_verbatim() {
        for secs in [1, 4, 12, 20] {
            let opts = GenerationOptions::default().with_duration(secs);
            let form = SubmissionForm::build("", "waves", &opts, "sora-2");
            assert_eq!(form.get("seconds"), Some(secs.to_string().as_str()));
        }
    }

    #[test]
    fn empty_image_url_is_text_to_video() {
        let form = SubmissionForm::build("", "a dog", &GenerationOptions::default(), "sora-2");
        assert!(!form.contains("input_reference"));
    }

    #[test]
    fn model_override_and_resolution() {
        let opts = GenerationOptions::default()
            .with_model("sora-2-pro")
            .with_resolution("1792x1024");
        let form = SubmissionForm::build("", "city", &opts, "sora-2");

        assert_eq!(form.get("model"), Some("sora-2-pro"));
        assert_eq!(form.get("size"), Some("1792x1024"));
    }

    #[test]
    fn prompt_is_not_validated() {
        let form = SubmissionForm::build("", "", &GenerationOptions::default(), "sora-2");
        assert_eq!(form.get("prompt"), Some(""));
    }
}

//! HTML rendering of the prediction page.

use minijinja::{context, Environment};

use crate::common::error::DiabResult;
use crate::data::service::ValidationErrors;

/// One line per rejected field.
pub fn problems(errors: &ValidationErrors) -> Vec<String> {
    errors.errors().iter().map(ToString::to_string).collect()
}

use super::form::{Slider, Verdict};

pub const TITLE: &str = "Diabetes Prediction (Machine Learning Model)";

const PAGE: &str = "page.html";

/// Template environment holding the single page template.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> DiabResult<Self> {
        let mut env = Environment::new();
        env.add_template(PAGE, include_str!("templates/page.html"))?;
        Ok(Self { env })
    }

    /// The form, optionally followed by a verdict or by the problems that
    /// prevented one.
    pub fn form(
        &self,
        sliders: &[Slider],
        verdict: Option<&Verdict>,
        errors: &[String],
    ) -> DiabResult<String> {
        let html = self.env.get_template(PAGE)?.render(context! {
            title => TITLE,
            sliders => sliders,
            verdict => verdict,
            errors => errors,
        })?;
        Ok(html)
    }

    /// Page shown instead of the form when the artefacts could not be loaded.
    pub fn load_error(&self, reason: &str) -> DiabResult<String> {
        let html = self.env.get_template(PAGE)?.render(context! {
            title => TITLE,
            load_error => reason,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::service::validate_fields;
    use crate::ui::form::{default_values, sliders, to_record};
    use std::collections::HashMap;

    #[test]
    fn form_lists_every_control() {
        let renderer = Renderer::new().unwrap();
        let html = renderer.form(&sliders(&default_values(), None), None, &[]).unwrap();

        assert!(html.contains(TITLE));
        assert!(html.contains("Enter Patient Information:"));
        assert_eq!(html.matches("type=\"range\"").count(), 8);
        assert!(html.contains("name=\"diabetes_pedigree_function\""));
        assert!(html.contains("step=\"0.0005\""));
        assert!(!html.contains("Prediction Result:"));
    }

    #[test]
    fn verdict_uses_alert_style_when_positive() {
        let renderer = Renderer::new().unwrap();
        let verdict = Verdict {
            positive: true,
            message: "The model predicts diabetes with a probability of 0.91".into(),
        };
        let html = renderer
            .form(&sliders(&default_values(), None), Some(&verdict), &[])
            .unwrap();
        assert!(html.contains("Prediction Result:"));
        assert!(html.contains("class=\"alert\" role=\"status\""));
        assert!(html.contains("probability of 0.91"));
    }

    #[test]
    fn rejected_fields_are_listed() {
        let renderer = Renderer::new().unwrap();
        let mut posted = HashMap::new();
        posted.insert("glucose".to_string(), "<b>".to_string());
        let errors = validate_fields(&to_record(&posted), &[]).unwrap_err();
        let html = renderer
            .form(&sliders(&default_values(), Some(&errors)), None, &problems(&errors))
            .unwrap();
        assert!(html.contains("glucose: Input should be a valid number"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn load_error_page_has_no_form() {
        let renderer = Renderer::new().unwrap();
        let html = renderer.load_error("artefact not found: model.json").unwrap();
        assert!(html.contains("Error loading model files: artefact not found: model.json"));
        assert!(!html.contains("<form"));
    }
}

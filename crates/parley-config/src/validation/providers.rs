//! Validation for the `[providers.*]` sections.

use parley_common::Provider;

use crate::schema::ParleyConfig;

use super::helpers::{validate_not_blank, validate_range, validate_range_f64};

pub(super) fn validate_providers(errors: &mut Vec<String>, config: &ParleyConfig) {
    for provider in Provider::ALL {
        let settings = config.providers.get(provider);
        let prefix = format!("providers.{}", provider.id());

        validate_range_f64(
            errors,
            &format!("{prefix}.temperature"),
            settings.temperature,
            0.0,
            2.0,
        );
        validate_range_f64(errors, &format!("{prefix}.top_p"), settings.top_p, 0.0, 1.0);
        validate_range(
            errors,
            &format!("{prefix}.max_tokens"),
            u64::from(settings.max_tokens),
            1,
            32_768,
        );

        for (i, model) in settings.models.iter().enumerate() {
            validate_not_blank(errors, &format!("{prefix}.models[{i}]"), model);
        }
        if let Some(ref url) = settings.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(format!("{prefix}.base_url must be an http(s) URL, got '{url}'"));
            }
        }
        if let Some(ref env) = settings.api_key_env {
            validate_not_blank(errors, &format!("{prefix}.api_key_env"), env);
        }
    }
}

//! Configuration validation.

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_cloud(config, &mut result);
        Self::validate_instance(config, &mut result);
        Self::validate_email(config, &mut result);
        Self::validate_schedule(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_cloud(config: &Config, result: &mut ValidationResult) {
        if config.cloud.region.is_empty() {
            result.add_error(ValidationError::new("cloud.region", "Region cannot be empty"));
        }

        for (path, bucket) in [
            ("cloud.temporary_bucket", &config.cloud.temporary_bucket),
            ("cloud.code_bucket", &config.cloud.code_bucket),
            ("cloud.data_bucket", &config.cloud.data_bucket),
        ] {
            if bucket.is_empty() {
                result.add_error(ValidationError::new(path, "Bucket name cannot be empty"));
            }
        }
    }

    fn validate_instance(config: &Config, result: &mut ValidationResult) {
        if config.instance.image_id.is_empty() {
            result.add_error(ValidationError::new(
                "instance.image_id",
                "Image id cannot be empty",
            ));
        }

        if config.instance.instance_type.is_empty() {
            result.add_error(ValidationError::new(
                "instance.instance_type",
                "Instance type cannot be empty",
            ));
        }

        if config.instance.security_groups.is_empty() {
            result.add_warning(ValidationWarning::new(
                "instance.security_groups",
                "No security groups configured, workers will use the account default",
            ));
        }
    }

    fn validate_email(config: &Config, result: &mut ValidationResult) {
        if !config.email.source.contains('@') {
            result.add_error(ValidationError::new(
                "email.source",
                "Sender must be an email address",
            ));
        }
    }

    fn validate_schedule(config: &Config, result: &mut ValidationResult) {
        if config.schedule.runner_path.is_empty() {
            result.add_error(ValidationError::new(
                "schedule.runner_path",
                "Runner path cannot be empty",
            ));
        } else if !config.schedule.runner_path.starts_with('/') {
            result.add_warning(ValidationWarning::new(
                "schedule.runner_path",
                "Runner path is not absolute, crontab entries may not resolve it",
            ));
        }
    }
}

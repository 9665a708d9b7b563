// Client intake: form validation for the profile record.

pub mod validation;

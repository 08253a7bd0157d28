/// Authentication screen state - Gateway

mod form;

pub use form::{AuthField, AuthForm, AuthMode};

pub mod auth_model;
pub mod auth_traits;
pub mod auth_validation;

pub use auth_model::{AuthSession, SignUpProfile, User};
pub use auth_traits::{require_user, AuthProvider};
pub use auth_validation::{password_strength, FormErrors, PasswordStrength, SignInForm, SignUpForm};

use crate::ecs::ComponentKind;
use thiserror::Error;

/// Errors that can occur while registering a system with the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemRegistrationError {
    #[error("system '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("system '{name}' does not require any components")]
    EmptyAccess { name: String },

    #[error("system '{name}' writes {component} but does not require it")]
    UndeclaredWrite {
        name: String,
        component: ComponentKind,
    },
}

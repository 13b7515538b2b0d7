//! Client side of the card form.
//!
//! [`FormController`] owns the [`VerificationMachine`] and gates submission on it. The
//! embedding page supplies an [`IdentityProvider`] for email magic links, forwards the
//! sign-in widget's success callback into a [`CallbackRegistry`], and renders from the
//! controller's queries.

pub mod client;
pub mod controller;
pub mod form;
pub mod identity;
pub mod notification;
pub mod social;
pub mod verification;

pub use client::{HttpSubmitClient, SubmissionTransport};
pub use controller::FormController;
pub use form::CardForm;
pub use identity::IdentityProvider;
pub use notification::{Notification, Notifier};
pub use social::{CallbackRegistry, Registration, SignInData, SocialWidget, WidgetMount};
pub use verification::{TransitionError, VerificationEvent, VerificationMachine, VerificationState};

use shared::Identity;
use thiserror::Error;

/// Identity-verification progress. Only one method can be in flight or completed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VerificationState {
    #[default]
    Unverified,
    PendingEmail {
        email: String,
    },
    VerifiedEmail(String),
    VerifiedFarcaster(String),
}

impl VerificationState {
    pub fn name(&self) -> &'static str {
        match self {
            VerificationState::Unverified => "unverified",
            VerificationState::PendingEmail { .. } => "pending email",
            VerificationState::VerifiedEmail(_) => "email verified",
            VerificationState::VerifiedFarcaster(_) => "farcaster verified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    StartEmail(String),
    EmailConfirmed,
    EmailFailed,
    SocialConfirmed(String),
    Logout,
}

impl VerificationEvent {
    fn name(&self) -> &'static str {
        match self {
            VerificationEvent::StartEmail(_) => "start email verification",
            VerificationEvent::EmailConfirmed => "confirm email",
            VerificationEvent::EmailFailed => "fail email verification",
            VerificationEvent::SocialConfirmed(_) => "confirm farcaster sign-in",
            VerificationEvent::Logout => "log out",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {event} while {state}")]
    NotAllowed {
        state: &'static str,
        event: &'static str,
    },

    #[error("{0}")]
    InvalidIdentity(String),
}

#[derive(Debug, Default)]
pub struct VerificationMachine {
    state: VerificationState,
}

impl VerificationMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Applies `event`. A rejected event leaves the state untouched.
    pub fn apply(&mut self, event: VerificationEvent) -> Result<&VerificationState, TransitionError> {
        let next = match (&self.state, event) {
            (_, VerificationEvent::Logout) => VerificationState::Unverified,

            (VerificationState::Unverified, VerificationEvent::StartEmail(email)) => {
                let identity = Identity::email(email)
                    .map_err(|e| TransitionError::InvalidIdentity(e.to_string()))?;
                VerificationState::PendingEmail {
                    email: identity.token().to_string(),
                }
            }

            (VerificationState::PendingEmail { email }, VerificationEvent::EmailConfirmed) => {
                VerificationState::VerifiedEmail(email.clone())
            }

            (VerificationState::PendingEmail { .. }, VerificationEvent::EmailFailed) => {
                VerificationState::Unverified
            }

            (VerificationState::Unverified, VerificationEvent::SocialConfirmed(fid)) => {
                let identity = Identity::farcaster_fid(fid)
                    .map_err(|e| TransitionError::InvalidIdentity(e.to_string()))?;
                VerificationState::VerifiedFarcaster(identity.token().to_string())
            }

            (state, event) => {
                return Err(TransitionError::NotAllowed {
                    state: state.name(),
                    event: event.name(),
                })
            }
        };

        tracing::debug!(from = self.state.name(), to = next.name(), "Verification transition");
        self.state = next;

        Ok(&self.state)
    }

    pub fn start_email(&mut self, email: &str) -> Result<&VerificationState, TransitionError> {
        self.apply(VerificationEvent::StartEmail(email.to_string()))
    }

    pub fn email_confirmed(&mut self) -> Result<&VerificationState, TransitionError> {
        self.apply(VerificationEvent::EmailConfirmed)
    }

    pub fn email_failed(&mut self) -> Result<&VerificationState, TransitionError> {
        self.apply(VerificationEvent::EmailFailed)
    }

    pub fn social_confirmed(&mut self, fid: &str) -> Result<&VerificationState, TransitionError> {
        self.apply(VerificationEvent::SocialConfirmed(fid.to_string()))
    }

    pub fn logout(&mut self) {
        self.state = VerificationState::Unverified;
    }

    pub fn is_verified(&self) -> bool {
        matches!(
            self.state,
            VerificationState::VerifiedEmail(_) | VerificationState::VerifiedFarcaster(_)
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, VerificationState::PendingEmail { .. })
    }

    /// The identity token held in a verified state.
    pub fn identity(&self) -> Option<Identity> {
        match &self.state {
            VerificationState::VerifiedEmail(email) => Some(Identity::Email(email.clone())),
            VerificationState::VerifiedFarcaster(fid) => Some(Identity::FarcasterFid(fid.clone())),
            _ => None,
        }
    }

    pub fn email_input_enabled(&self) -> bool {
        matches!(self.state, VerificationState::Unverified)
    }

    pub fn verify_button_enabled(&self, email: &str, provider_ready: bool) -> bool {
        self.email_input_enabled() && provider_ready && !email.trim().is_empty()
    }

    pub fn email_panel_visible(&self) -> bool {
        !matches!(self.state, VerificationState::VerifiedFarcaster(_))
    }

    pub fn social_widget_visible(&self) -> bool {
        matches!(self.state, VerificationState::Unverified)
    }
}

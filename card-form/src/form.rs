use shared::{CardFields, CardSubmission, CardType, Identity, Result, ServiceError};

/// Raw inputs of the card form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub email: String,
    card_type: Option<CardType>,
    pub sub_type: String,
    pub card_text: String,
    pub flaw_name: String,
    pub agreed: bool,
}

impl CardForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card_type(&self) -> Option<CardType> {
        self.card_type
    }

    /// Selects a card type. A sub-type that does not belong to it is cleared.
    pub fn select_card_type(&mut self, card_type: CardType) {
        let belongs = card_type
            .sub_type_options()
            .iter()
            .any(|name| *name == self.sub_type);
        if !belongs {
            self.sub_type.clear();
        }
        self.card_type = Some(card_type);
    }

    pub fn flaw_name_visible(&self) -> bool {
        self.card_type == Some(CardType::Flaw)
    }

    /// Labels of required inputs that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        match self.card_type {
            None => missing.push("Card Type"),
            Some(card_type) => {
                if self.sub_type.trim().is_empty() {
                    missing.push(card_type.sub_type_label());
                }
            }
        }

        if self.card_text.trim().is_empty() {
            missing.push("Card Text");
        }

        if self.flaw_name_visible() && self.flaw_name.trim().is_empty() {
            missing.push("Flaw Name");
        }

        missing
    }

    /// Builds the submission for `identity` from the current inputs.
    pub fn assemble(&self, identity: Identity) -> Result<CardSubmission> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Please fill in these required fields: {}",
                missing.join(", ")
            )));
        }

        let card_type = self
            .card_type
            .ok_or_else(|| ServiceError::Validation("Card type not selected".to_string()))?;

        let flaw_name = self.flaw_name_visible().then_some(self.flaw_name.as_str());
        let fields = CardFields::build(card_type, self.sub_type.trim(), flaw_name)?;

        CardSubmission::new(identity, fields, self.card_text.as_str(), self.agreed)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

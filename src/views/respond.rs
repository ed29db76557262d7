//! Public RSVP form. Needs no session; the invite code is the credential.

use owo_colors::OwoColorize;
use wedo_core::api::ApiClient;
use wedo_core::RespondToInviteRequest;

use crate::render::heading;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttendingChoice {
    #[default]
    Attending,
    NotAttending,
}

impl AttendingChoice {
    pub fn is_attending(self) -> bool {
        self == AttendingChoice::Attending
    }
}

#[derive(Debug, Default)]
pub struct RespondView {
    org_id: String,
    family_name: String,
    invite_id: String,
    choice: AttendingChoice,
    form_submit_success: bool,
    form_submit_failed: bool,
}

impl RespondView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_org_id(&mut self, org_id: impl Into<String>) {
        self.org_id = org_id.into();
    }

    pub fn set_family_name(&mut self, family_name: impl Into<String>) {
        self.family_name = family_name.into();
    }

    pub fn set_invite_id(&mut self, invite_id: impl Into<String>) {
        self.invite_id = invite_id.into();
    }

    pub fn set_choice(&mut self, choice: AttendingChoice) {
        self.choice = choice;
    }

    pub fn form_submit_success(&self) -> bool {
        self.form_submit_success
    }

    pub fn form_submit_failed(&self) -> bool {
        self.form_submit_failed
    }

    fn request(&self) -> RespondToInviteRequest {
        RespondToInviteRequest {
            org_id: self.org_id.clone(),
            invite_id: self.invite_id.clone(),
            family_name: self.family_name.clone(),
            attending: self.choice.is_attending(),
        }
    }

    /// Labels of the required fields left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("Organizer's Principal ID", &self.org_id),
            ("Family Name", &self.family_name),
            ("Invite Code", &self.invite_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// Submit the response. The outcome only flips the message flags; the form stays.
    pub async fn submit(&mut self, api: &ApiClient) {
        if !self.missing_fields().is_empty() {
            log::debug!("Not submitting incomplete response form");
            self.form_submit_success = false;
            self.form_submit_failed = true;
            return;
        }

        match api.respond_to_invite(&self.request()).await {
            Ok(()) => {
                self.form_submit_success = true;
                self.form_submit_failed = false;
            }
            Err(e) => {
                log::debug!("Response to invite {} failed: {e}", self.invite_id);
                self.form_submit_success = false;
                self.form_submit_failed = true;
            }
        }
    }

    pub fn render(&self) -> String {
        let radio = |choice: AttendingChoice| if self.choice == choice { "(•)" } else { "( )" };

        let mut lines = vec![
            heading("Respond"),
            String::new(),
            format!("{:<24} {}", "Organizer's Principal ID", self.org_id),
            format!("{:<24} {}", "Family Name", self.family_name),
            format!("{:<24} {}", "Invite Code", self.invite_id),
            format!(
                "{} I will be attending   {} I will not be attending",
                radio(AttendingChoice::Attending),
                radio(AttendingChoice::NotAttending)
            ),
        ];

        if self.form_submit_success {
            lines.push(String::new());
            lines.push("Response Submitted".green().bold().to_string());
            lines.push("Thank you for your response. See you there!".to_string());
        }

        if self.form_submit_failed {
            let missing = self.missing_fields();
            lines.push(String::new());
            lines.push("Something went wrong".red().bold().to_string());
            if missing.is_empty() {
                lines.push("Please try again later, sorry!".to_string());
            } else {
                lines.push(format!("{} required", missing.join(", ")));
            }
        }

        lines.join("\n")
    }
}

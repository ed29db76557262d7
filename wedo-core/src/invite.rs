//! Invite record model as exchanged with the invites API.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the invited party attends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteType {
    #[default]
    Zoom,
    Guest,
}

impl InviteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteType::Zoom => "zoom",
            InviteType::Guest => "guest",
        }
    }
}

impl fmt::Display for InviteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InviteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zoom" => Ok(InviteType::Zoom),
            "guest" => Ok(InviteType::Guest),
            other => Err(format!("Unknown invite type '{other}' (expected zoom or guest)")),
        }
    }
}

/// One invited party, tracked from creation through RSVP.
///
/// `invite_id` is the code printed on the invite; knowing it (together with the
/// organizer id and family name) is what authorizes a public response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub invite_id: String,
    pub family_name: String,
    pub create_ts: String,
    #[serde(rename = "type")]
    pub invite_type: InviteType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    #[serde(default)]
    pub responded: bool,
    #[serde(default)]
    pub attending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<BTreeSet<String>>,
}

/// Card colour used when listing invites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor {
    Green,
    Pink,
    Grey,
}

impl Invite {
    /// Green when attending, pink when only responded, grey otherwise.
    pub fn card_color(&self) -> CardColor {
        if self.attending {
            CardColor::Green
        } else if self.responded {
            CardColor::Pink
        } else {
            CardColor::Grey
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.create_ts)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn attachments(&self) -> impl Iterator<Item = &str> {
        self.attachments.iter().flatten().map(String::as_str)
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.as_ref().map_or(0, BTreeSet::len)
    }

    /// Patch that echoes every editable field with `responded` flipped.
    pub fn toggled_responded(&self) -> UpdateInviteRequest {
        UpdateInviteRequest::full(
            &self.family_name,
            self.invite_type,
            !self.responded,
            self.attending,
        )
    }

    /// Patch that echoes every editable field with `attending` flipped.
    pub fn toggled_attending(&self) -> UpdateInviteRequest {
        UpdateInviteRequest::full(
            &self.family_name,
            self.invite_type,
            self.responded,
            !self.attending,
        )
    }
}

/// An individual attendee of an invite. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub guest_id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Guest {
    pub fn contact_or_default(&self) -> &str {
        match self.contact.as_deref() {
            Some(contact) if !contact.is_empty() => contact,
            _ => "No contact info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteRequest {
    pub family_name: String,
    #[serde(rename = "type")]
    pub invite_type: InviteType,
}

/// Partial update: fields left as `None` are not sent and stay untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInviteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub invite_type: Option<InviteType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attending: Option<bool>,
}

impl UpdateInviteRequest {
    /// Patch carrying all four editable fields.
    pub fn full(
        family_name: &str,
        invite_type: InviteType,
        responded: bool,
        attending: bool,
    ) -> Self {
        UpdateInviteRequest {
            family_name: Some(family_name.to_string()),
            invite_type: Some(invite_type),
            responded: Some(responded),
            attending: Some(attending),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.family_name.is_none()
            && self.invite_type.is_none()
            && self.responded.is_none()
            && self.attending.is_none()
    }
}

/// Public RSVP. The invite code goes in the URL; the rest is the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RespondToInviteRequest {
    pub org_id: String,
    pub invite_id: String,
    pub family_name: String,
    pub attending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invite(responded: bool, attending: bool) -> Invite {
        Invite {
            invite_id: "A1".into(),
            family_name: "Lee".into(),
            create_ts: "2021-06-01T12:00:00.000Z".into(),
            invite_type: InviteType::Guest,
            qr_code_url: None,
            responded,
            attending,
            attachments: None,
        }
    }

    #[test]
    fn card_color_follows_attendance_then_response() {
        assert_eq!(invite(false, false).card_color(), CardColor::Grey);
        assert_eq!(invite(true, false).card_color(), CardColor::Pink);
        assert_eq!(invite(true, true).card_color(), CardColor::Green);
        // attending wins even when not marked responded
        assert_eq!(invite(false, true).card_color(), CardColor::Green);
    }

    #[test]
    fn toggles_flip_only_their_flag() {
        let inv = invite(false, true);

        let responded = inv.toggled_responded();
        assert_eq!(responded.family_name.as_deref(), Some("Lee"));
        assert_eq!(responded.invite_type, Some(InviteType::Guest));
        assert_eq!(responded.responded, Some(true));
        assert_eq!(responded.attending, Some(true));

        let attending = inv.toggled_attending();
        assert_eq!(attending.responded, Some(false));
        assert_eq!(attending.attending, Some(false));
    }

    #[test]
    fn parses_api_invite_payload() {
        let value = json!({
            "inviteId": "XYZ123",
            "familyName": "Smith",
            "createTs": "2021-06-01T12:00:00.000Z",
            "type": "zoom",
            "qrCodeUrl": "https://bucket/qr/XYZ123.png",
            "responded": true,
            "attending": false,
            "attachments": ["https://bucket/b.pdf", "https://bucket/a.pdf"]
        });

        let inv: Invite = serde_json::from_value(value).unwrap();

        assert_eq!(inv.invite_type, InviteType::Zoom);
        assert_eq!(inv.qr_code_url.as_deref(), Some("https://bucket/qr/XYZ123.png"));
        assert_eq!(inv.attachment_count(), 2);
        assert_eq!(
            inv.attachments().collect::<Vec<_>>(),
            vec!["https://bucket/a.pdf", "https://bucket/b.pdf"]
        );
        assert!(inv.created_at().is_some());
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let inv: Invite = serde_json::from_value(json!({
            "inviteId": "A1",
            "familyName": "Lee",
            "createTs": "not a date",
            "type": "guest"
        }))
        .unwrap();

        assert!(!inv.responded);
        assert!(!inv.attending);
        assert_eq!(inv.attachment_count(), 0);
        assert!(inv.created_at().is_none());
    }

    #[test]
    fn partial_update_omits_unset_fields() {
        let patch = UpdateInviteRequest {
            attending: Some(true),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "attending": true }));
        assert!(UpdateInviteRequest::default().is_empty());
    }

    #[test]
    fn full_update_uses_wire_names() {
        let patch = UpdateInviteRequest::full("Lee", InviteType::Zoom, true, false);

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "familyName": "Lee", "type": "zoom", "responded": true, "attending": false })
        );
    }

    #[test]
    fn guest_without_contact_gets_placeholder() {
        let guest = Guest {
            guest_id: "g1".into(),
            full_name: "Ann Lee".into(),
            contact: None,
        };
        assert_eq!(guest.contact_or_default(), "No contact info");
    }

    #[test]
    fn invite_type_from_str_is_case_insensitive() {
        assert_eq!("Guest".parse::<InviteType>(), Ok(InviteType::Guest));
        assert!("party".parse::<InviteType>().is_err());
    }
}

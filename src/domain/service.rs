use crate::domain::status::ServiceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type ServiceId = i64;

/// One repair intake, as stored in the remote `services` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub item_name: String,
    #[serde(default)]
    pub item_damage: Option<String>,
    pub status: ServiceStatus,
    #[serde(default, deserialize_with = "null_as_false")]
    pub high_priority: bool,
}

/// Fields supplied by the intake form. `id`, `created_at` and `status`
/// are never part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub item_name: String,
    pub item_damage: Option<String>,
    pub high_priority: bool,
}

/// Partial update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_damage: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_priority: Option<bool>,
}

impl NewService {
    /// Trims free text and turns blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        Self {
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: blank_to_none(self.customer_phone),
            item_name: self.item_name.trim().to_string(),
            item_damage: blank_to_none(self.item_damage),
            high_priority: self.high_priority,
        }
    }

    /// Returns the message shown to the user when a required field is empty.
    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() || self.item_name.trim().is_empty() {
            return Err("Nama pelanggan dan nama barang wajib diisi.".into());
        }
        Ok(())
    }
}

impl ServicePatch {
    pub fn status(status: ServiceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Full-field edit from the edit form. Status is changed only through
    /// the transition policy, never here.
    pub fn edit(fields: NewService) -> Self {
        let fields = fields.normalized();
        Self {
            customer_name: Some(fields.customer_name),
            customer_phone: Some(fields.customer_phone),
            item_name: Some(fields.item_name),
            item_damage: Some(fields.item_damage),
            status: None,
            high_priority: Some(fields.high_priority),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.customer_name) || blank(&self.item_name) {
            return Err("Nama pelanggan dan nama barang wajib diisi.".into());
        }
        Ok(())
    }

    /// Applies the patch locally, mirroring what the store does remotely.
    pub fn apply_to(&self, record: &mut ServiceRecord) {
        if let Some(v) = &self.customer_name {
            record.customer_name = v.clone();
        }
        if let Some(v) = &self.customer_phone {
            record.customer_phone = v.clone();
        }
        if let Some(v) = &self.item_name {
            record.item_name = v.clone();
        }
        if let Some(v) = &self.item_damage {
            record.item_damage = v.clone();
        }
        if let Some(v) = self.status {
            record.status = v;
        }
        if let Some(v) = self.high_priority {
            record.high_priority = v;
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

//! String (de)serialization for [`EntityKind`] and [`FormattedId`].
//!
//! Entity kinds travel as their keys (`"menu_items"`), formatted IDs as their
//! display form (`"MENU-0012"`).

use crate::{EntityKind, FormattedId};
use ::serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::borrow::Cow;

impl Serialize for EntityKind {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    /// # Errors
    ///
    /// Fails for keys with no registered ID configuration.
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = Cow::<'de, str>::deserialize(d)?;
        key.parse().map_err(de::Error::custom)
    }
}

impl Serialize for FormattedId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FormattedId {
    /// # Errors
    ///
    /// Fails for strings that are not `<known prefix>-<digits>`.
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Cow::<'de, str>::deserialize(d)?;
        FormattedId::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_uses_its_key() {
        let json = serde_json::to_string(&EntityKind::HousekeepingTask).unwrap();
        assert_eq!(json, r#""housekeeping_tasks""#);
        let kind: EntityKind = serde_json::from_str(r#""menu_items""#).unwrap();
        assert_eq!(kind, EntityKind::MenuItem);
    }

    #[test]
    fn unknown_entity_kind_fails() {
        let err = serde_json::from_str::<EntityKind>(r#""spaceships""#).unwrap_err();
        assert!(err.to_string().contains("spaceships"));
    }

    #[test]
    fn formatted_id_uses_display_form() {
        let id = FormattedId::new(EntityKind::Order, 123);
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""ORD-000123""#);
        let back: FormattedId = serde_json::from_str(r#""ORD-000123""#).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<FormattedId>(r#""ORD-12-AB""#).is_err());
    }

    #[test]
    fn formatted_id_reserializes_canonically() {
        let id: FormattedId = serde_json::from_str(r#""ORD-123""#).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""ORD-000123""#);
    }
}

//! Generic property access with an access context.
//!
//! The resource's fields are reachable through a typed get/set capability
//! composed into the aggregate. `Raw` access returns canonical typed
//! values; `View` access renders them for presentation (instants as
//! RFC 3339 text, scalars as display strings). A set that fails validation
//! leaves the target field unchanged.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ValidationError;
use crate::instant::parse_instant;
use crate::resource::{prop, Resource};

/// How a property read is filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessContext {
    /// Canonical typed values.
    Raw,

    /// Presentation rendering: instants as RFC 3339 text, scalars as
    /// display strings.
    View,
}

/// A dynamically-typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A boolean flag.
    Bool(bool),

    /// A text scalar (identifiers travel in string form).
    Text(String),

    /// A list of text scalars.
    TextList(Vec<String>),

    /// A single instant.
    Instant(DateTime<Utc>),

    /// A list of instants.
    InstantList(Vec<DateTime<Utc>>),
}

/// Typed get/set over named properties with an access context.
///
/// Composed into the aggregate rather than inherited; the property store
/// and presentation layers go through this seam instead of reaching into
/// fields.
pub trait PropertyContainer {
    /// Read one property. `None` for unset fields and unknown keys.
    fn property(&self, key: &str, context: AccessContext) -> Option<PropertyValue>;

    /// Set one property.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] when the key is unknown or the value has the
    /// wrong shape for it; the field is left unchanged.
    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), ValidationError>;

    /// All property keys the container understands.
    fn property_keys() -> &'static [&'static str]
    where
        Self: Sized;
}

const RESOURCE_KEYS: &[&str] = &[
    prop::ID,
    prop::EXTERNAL_ID,
    prop::SUBSCRIPTION_ID,
    prop::DATE_CREATED,
    prop::IS_PRE_PAID,
    prop::IS_PRORATED,
    prop::ACTIVATION_TIMESTAMPS,
    prop::DEACTIVATION_TIMESTAMPS,
];

impl PropertyContainer for Resource {
    fn property(&self, key: &str, context: AccessContext) -> Option<PropertyValue> {
        match key {
            prop::ID => self.id.map(|id| PropertyValue::Text(id.to_string())),
            prop::EXTERNAL_ID => self.external_id.clone().map(PropertyValue::Text),
            prop::SUBSCRIPTION_ID => self
                .subscription_id
                .map(|id| PropertyValue::Text(id.to_string())),
            prop::DATE_CREATED => self.date_created.map(|created| match context {
                AccessContext::Raw => PropertyValue::Instant(created),
                AccessContext::View => PropertyValue::Text(render_instant(created)),
            }),
            prop::IS_PRE_PAID => Some(render_bool(self.is_pre_paid, context)),
            prop::IS_PRORATED => Some(render_bool(self.is_prorated, context)),
            prop::ACTIVATION_TIMESTAMPS => Some(render_instants(
                self.ledger.activations(),
                context,
            )),
            prop::DEACTIVATION_TIMESTAMPS => Some(render_instants(
                self.ledger.deactivations(),
                context,
            )),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) -> Result<(), ValidationError> {
        match key {
            prop::ID => match value {
                PropertyValue::Text(text) => {
                    self.id = Some(text.parse()?);
                    Ok(())
                }
                _ => Err(wrong_shape(key, "text identifier")),
            },
            prop::EXTERNAL_ID => match value {
                PropertyValue::Text(text) => {
                    self.external_id = Some(text);
                    Ok(())
                }
                _ => Err(wrong_shape(key, "text")),
            },
            prop::SUBSCRIPTION_ID => match value {
                PropertyValue::Text(text) => {
                    self.subscription_id = Some(text.parse()?);
                    Ok(())
                }
                _ => Err(wrong_shape(key, "text identifier")),
            },
            prop::DATE_CREATED => match value {
                PropertyValue::Instant(instant) => {
                    self.date_created = Some(instant);
                    Ok(())
                }
                PropertyValue::Text(text) => {
                    self.date_created = Some(parse_instant(&text)?);
                    Ok(())
                }
                _ => Err(wrong_shape(key, "instant or instant text")),
            },
            prop::IS_PRE_PAID => match value {
                PropertyValue::Bool(flag) => {
                    self.is_pre_paid = flag;
                    Ok(())
                }
                _ => Err(wrong_shape(key, "bool")),
            },
            prop::IS_PRORATED => match value {
                PropertyValue::Bool(flag) => {
                    self.is_prorated = flag;
                    Ok(())
                }
                _ => Err(wrong_shape(key, "bool")),
            },
            prop::ACTIVATION_TIMESTAMPS => {
                let instants = instants_from(key, value)?;
                self.ledger.set_activations(instants);
                Ok(())
            }
            prop::DEACTIVATION_TIMESTAMPS => {
                let instants = instants_from(key, value)?;
                self.ledger.set_deactivations(instants);
                Ok(())
            }
            _ => Err(ValidationError::UnknownProperty {
                name: key.to_owned(),
            }),
        }
    }

    fn property_keys() -> &'static [&'static str] {
        RESOURCE_KEYS
    }
}

fn render_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn render_bool(flag: bool, context: AccessContext) -> PropertyValue {
    match context {
        AccessContext::Raw => PropertyValue::Bool(flag),
        AccessContext::View => PropertyValue::Text(flag.to_string()),
    }
}

fn render_instants(instants: &[DateTime<Utc>], context: AccessContext) -> PropertyValue {
    match context {
        AccessContext::Raw => PropertyValue::InstantList(instants.to_vec()),
        AccessContext::View => {
            PropertyValue::TextList(instants.iter().copied().map(render_instant).collect())
        }
    }
}

/// Coerce a value into an instant sequence, parsing text wholesale so a
/// malformed element leaves the target sequence untouched.
fn instants_from(
    key: &str,
    value: PropertyValue,
) -> Result<Vec<DateTime<Utc>>, ValidationError> {
    match value {
        PropertyValue::InstantList(instants) => Ok(instants),
        PropertyValue::TextList(texts) => texts
            .iter()
            .map(|text| parse_instant(text))
            .collect(),
        _ => Err(wrong_shape(key, "instant list or instant text list")),
    }
}

fn wrong_shape(key: &str, expected: &'static str) -> ValidationError {
    ValidationError::WrongShape {
        property: key.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn unset_fields_read_as_none() {
        let resource = Resource::new();
        assert_eq!(resource.property(prop::ID, AccessContext::Raw), None);
        assert_eq!(
            resource.property(prop::DATE_CREATED, AccessContext::View),
            None
        );
    }

    #[test]
    fn raw_and_view_diverge_on_instants() {
        let mut resource = Resource::new();
        resource.date_created = Some(at(5, 8));

        assert_eq!(
            resource.property(prop::DATE_CREATED, AccessContext::Raw),
            Some(PropertyValue::Instant(at(5, 8)))
        );
        assert_eq!(
            resource.property(prop::DATE_CREATED, AccessContext::View),
            Some(PropertyValue::Text("2024-03-05T08:00:00Z".to_owned()))
        );
    }

    #[test]
    fn view_renders_flags_as_text() {
        let resource = Resource::new();
        assert_eq!(
            resource.property(prop::IS_PRE_PAID, AccessContext::Raw),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(
            resource.property(prop::IS_PRE_PAID, AccessContext::View),
            Some(PropertyValue::Text("true".to_owned()))
        );
    }

    #[test]
    fn set_date_created_from_text() {
        let mut resource = Resource::new();
        resource
            .set_property(
                prop::DATE_CREATED,
                PropertyValue::Text("2024-03-05T08:00:00Z".to_owned()),
            )
            .unwrap();
        assert_eq!(resource.date_created, Some(at(5, 8)));
    }

    #[test]
    fn malformed_instant_leaves_field_unchanged() {
        let mut resource = Resource::new();
        resource.date_created = Some(at(5, 8));

        let err = resource
            .set_property(
                prop::DATE_CREATED,
                PropertyValue::Text("not a date".to_owned()),
            )
            .unwrap_err();

        assert!(matches!(err, ValidationError::MalformedInstant { .. }));
        assert_eq!(resource.date_created, Some(at(5, 8)));
    }

    #[test]
    fn timestamp_sequences_replace_wholesale() {
        let mut resource = Resource::new();
        resource
            .set_property(
                prop::ACTIVATION_TIMESTAMPS,
                PropertyValue::InstantList(vec![at(3, 8), at(7, 8)]),
            )
            .unwrap();
        resource
            .set_property(
                prop::DEACTIVATION_TIMESTAMPS,
                PropertyValue::TextList(vec!["2024-03-05T08:00:00Z".to_owned()]),
            )
            .unwrap();

        assert_eq!(resource.ledger.activations(), &[at(3, 8), at(7, 8)]);
        assert_eq!(resource.ledger.deactivations(), &[at(5, 8)]);
    }

    #[test]
    fn malformed_element_rejects_the_whole_sequence() {
        let mut resource = Resource::new();
        resource.ledger.set_activations(vec![at(3, 8)]);

        let err = resource
            .set_property(
                prop::ACTIVATION_TIMESTAMPS,
                PropertyValue::TextList(vec![
                    "2024-03-05T08:00:00Z".to_owned(),
                    "garbage".to_owned(),
                ]),
            )
            .unwrap_err();

        assert!(matches!(err, ValidationError::MalformedInstant { .. }));
        assert_eq!(resource.ledger.activations(), &[at(3, 8)]);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let mut resource = Resource::new();
        let err = resource
            .set_property(prop::IS_PRORATED, PropertyValue::Text("yes".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ValidationError::WrongShape { .. }));
        assert!(!resource.is_prorated);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut resource = Resource::new();
        let err = resource
            .set_property("billing_amount", PropertyValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownProperty { .. }));
        assert_eq!(resource.property("billing_amount", AccessContext::Raw), None);
    }

    #[test]
    fn id_round_trips_through_text() {
        let mut resource = Resource::new();
        let id = crate::ids::ResourceId::generate();
        resource
            .set_property(prop::ID, PropertyValue::Text(id.to_string()))
            .unwrap();
        assert_eq!(
            resource.property(prop::ID, AccessContext::Raw),
            Some(PropertyValue::Text(id.to_string()))
        );
    }

    #[test]
    fn property_keys_cover_every_field() {
        assert_eq!(Resource::property_keys().len(), 8);
    }
}

//! Users service types: doctors, carers and family members

use serde::{Deserialize, Serialize};

use super::{ContactInfo, FullName};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub full_name: Option<FullName>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
}

/// Body for creating or updating a doctor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<FullName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Link between an account holder and the resident they look after
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub linked_resident_id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<FullName>,
    #[serde(default)]
    pub contact_email: Option<ContactInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_resident_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<FullName>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_nested_shapes() {
        let doctor: Doctor = serde_json::from_str(
            r#"{"id": 2, "specialty": "Cardiología",
                "fullName": {"firstName": "Luis", "lastName": "Paz"},
                "contactInfo": {"phone": "999", "address": {"city": "Lima"}}}"#,
        )
        .unwrap();
        assert_eq!(doctor.full_name.unwrap().display(), "Luis Paz");
        let contact = doctor.contact_info.unwrap();
        assert_eq!(contact.phone.as_deref(), Some("999"));
        assert_eq!(contact.address.unwrap().city.as_deref(), Some("Lima"));
    }

    #[test]
    fn test_family_member_request_shape() {
        let request = FamilyMemberRequest {
            relationship: Some("Hija".into()),
            linked_resident_id: Some(9),
            full_name: Some(FullName::split("Juan Pérez")),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "relationship": "Hija",
                "linkedResidentId": 9,
                "fullName": {"firstName": "Juan", "lastName": "Pérez"}
            })
        );
    }
}

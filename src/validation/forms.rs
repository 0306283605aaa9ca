//! Form models
//!
//! Each form holds raw user input as typed in, validates it as a whole and
//! converts into the request body of the matching service call.

use crate::models::{
    non_empty, Address, AppointmentRequest, CarerRequest, ContactInfo, DoctorRequest,
    FamilyMemberRequest, FoodEntryDraft, FullName, LocalTime, MealType, PaymentRequestDraft,
    ReceiptRequest, ResidentRequest, SignInRequest, SignUpRequest,
};
use crate::routing::Role;

use super::rules::{self, Rule, ValidationErrors};

pub const PASSWORD_MIN: usize = 6;
pub const NAME_MIN: usize = 3;

fn optional_date(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if !value.trim().is_empty() {
        errors.check(field, rules::date(value));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("email", rules::email(&self.email));
        errors.check(
            "password",
            rules::required(&self.password)
                .and_then(|_| rules::min_length(&self.password, PASSWORD_MIN)),
        );
        errors.into_result()
    }

    /// IAM signs users in by username, which is their email
    pub fn to_request(&self) -> Result<SignInRequest, ValidationErrors> {
        self.validate()?;
        Ok(SignInRequest {
            username: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
    pub phone: String,
    pub relationship: String,
    pub resident_name: String,
    pub resident_age: String,
    pub resident_birth_date: String,
    pub resident_condition: String,
    pub license_number: String,
    pub specialty: String,
    pub dni: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "name",
            rules::required(&self.name).and_then(|_| rules::min_length(self.name.trim(), NAME_MIN)),
        );
        errors.check("email", rules::email(&self.email));
        errors.check(
            "password",
            rules::required(&self.password)
                .and_then(|_| rules::min_length(&self.password, PASSWORD_MIN)),
        );
        if self.confirm_password.is_empty() {
            errors.push("confirmPassword", Rule::Required);
        } else if self.confirm_password != self.password {
            errors.push("confirmPassword", Rule::Mismatch { other: "password" });
        }
        errors.check("role", rules::required_some(&self.role));
        if self.role.is_some_and(|role| !role.can_sign_up()) {
            errors.push("role", Rule::Invalid);
        }

        match self.role {
            Some(Role::FamilyMember) => {
                errors.check("residentName", rules::required(&self.resident_name));
                errors.check(
                    "residentAge",
                    rules::integer(&self.resident_age).and_then(|age| rules::min(age as f64, 0)),
                );
                optional_date(&mut errors, "residentBirthDate", &self.resident_birth_date);
            }
            Some(Role::Doctor) => {
                errors.check("licenseNumber", rules::required(&self.license_number));
                errors.check("specialty", rules::required(&self.specialty));
            }
            _ => {}
        }
        errors.into_result()
    }

    /// Sign-up body carrying the chosen role's IAM name
    pub fn sign_up_request(&self) -> Result<SignUpRequest, ValidationErrors> {
        self.validate()?;
        Ok(SignUpRequest {
            username: self.email.trim().to_string(),
            password: self.password.clone(),
            roles: self
                .role
                .map(|r| vec![r.iam_name().to_string()])
                .unwrap_or_default(),
        })
    }

    pub fn sign_in_request(&self) -> SignInRequest {
        SignInRequest {
            username: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Resident age once validated; zero when absent
    pub fn resident_age(&self) -> u32 {
        self.resident_age.trim().parse().unwrap_or(0)
    }

    /// Resident created for a family member; the name is split like any full name
    pub fn resident_request(&self) -> ResidentRequest {
        let name = FullName::split(&self.resident_name);
        ResidentRequest {
            dni: non_empty(&self.dni),
            first_name: name.first_name,
            last_name: name.last_name,
            birth_date: non_empty(&self.resident_birth_date),
            ..ResidentRequest::default()
        }
    }

    pub fn family_member_request(&self, resident_id: i64) -> FamilyMemberRequest {
        FamilyMemberRequest {
            relationship: non_empty(&self.relationship).or_else(|| Some("Familiar".to_string())),
            linked_resident_id: Some(resident_id),
            full_name: Some(FullName::split(&self.name)),
        }
    }

    pub fn doctor_request(&self) -> DoctorRequest {
        DoctorRequest {
            license_number: non_empty(&self.license_number),
            specialty: non_empty(&self.specialty),
            full_name: Some(FullName::split(&self.name)),
            contact_info: non_empty(&self.phone).map(|phone| ContactInfo {
                phone: Some(phone),
                address: None,
            }),
        }
    }

    pub fn carer_request(&self) -> CarerRequest {
        CarerRequest {
            dni: non_empty(&self.dni),
            full_name: non_empty(&self.name),
            email: non_empty(&self.email),
            password: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidentForm {
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub gender: String,
    pub address: Address,
}

impl ResidentForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("dni", rules::required(&self.dni));
        errors.check("firstName", rules::required(&self.first_name));
        errors.check("lastName", rules::required(&self.last_name));
        optional_date(&mut errors, "birthDate", &self.birth_date);
        errors.into_result()
    }

    pub fn to_request(&self) -> Result<ResidentRequest, ValidationErrors> {
        self.validate()?;
        Ok(ResidentRequest {
            dni: non_empty(&self.dni),
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            birth_date: non_empty(&self.birth_date),
            gender: non_empty(&self.gender),
            ..ResidentRequest::default()
        }
        .with_address(&self.address))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentForm {
    pub resident_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

impl AppointmentForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("residentId", rules::integer(&self.resident_id));
        errors.check("doctorId", rules::integer(&self.doctor_id));
        errors.check("date", rules::date(&self.date));
        errors.check("time", rules::time(&self.time));
        errors.into_result()
    }

    pub fn to_request(&self) -> Result<AppointmentRequest, ValidationErrors> {
        self.validate()?;
        Ok(AppointmentRequest {
            resident_id: self.resident_id.trim().parse().ok(),
            doctor_id: self.doctor_id.trim().parse().ok(),
            date: non_empty(&self.date),
            time: LocalTime::parse(&self.time),
            status: non_empty(&self.status).or_else(|| Some("SCHEDULED".to_string())),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptForm {
    pub resident_id: String,
    pub total_amount: String,
    pub issue_date: String,
    pub due_date: String,
    pub kind: String,
    pub paid: bool,
}

impl ReceiptForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("residentId", rules::integer(&self.resident_id));
        errors.check(
            "totalAmount",
            rules::number(&self.total_amount).and_then(|amount| rules::min(amount, 0)),
        );
        let issue = rules::date(&self.issue_date);
        let due = rules::date(&self.due_date);
        if let (Ok(issue), Ok(due)) = (&issue, &due) {
            if due < issue {
                errors.push("dueDate", Rule::Invalid);
            }
        }
        errors.check("issueDate", issue);
        errors.check("dueDate", due);
        errors.into_result()
    }

    pub fn to_request(&self) -> Result<ReceiptRequest, ValidationErrors> {
        self.validate()?;
        Ok(ReceiptRequest {
            resident_id: self.resident_id.trim().parse().ok(),
            total_amount: self.total_amount.trim().parse().ok(),
            issue_date: non_empty(&self.issue_date),
            due_date: non_empty(&self.due_date),
            kind: non_empty(&self.kind),
            status: Some(self.paid),
            ..ReceiptRequest::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodEntryForm {
    pub meal: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub target_id: String,
    pub resident_id: String,
}

impl FoodEntryForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "meal",
            rules::required(&self.meal)
                .and_then(|_| self.meal.parse::<MealType>().map_err(|_| Rule::Invalid)),
        );
        errors.check("description", rules::required(&self.description));
        errors.check("date", rules::date(&self.date));
        errors.check("time", rules::time(&self.time));
        if !self.resident_id.trim().is_empty() {
            errors.check("residentId", rules::integer(&self.resident_id));
        }
        errors.into_result()
    }

    /// Entry body; the author comes from the session
    pub fn to_draft(
        &self,
        added_by: Option<String>,
        added_by_id: Option<String>,
    ) -> Result<FoodEntryDraft, ValidationErrors> {
        self.validate()?;
        let mut errors = ValidationErrors::new();
        let meal = match self.meal.parse::<MealType>() {
            Ok(meal) => meal,
            Err(_) => {
                errors.push("meal", Rule::Invalid);
                return Err(errors);
            }
        };
        Ok(FoodEntryDraft {
            meal,
            description: self.description.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            added_by,
            added_by_id,
            target_id: non_empty(&self.target_id),
            resident_id: self.resident_id.trim().parse().ok(),
        })
    }
}

/// A carer asking a family member to pay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentRequestForm {
    pub period: String,
    pub concept: String,
    pub amount: String,
    pub payer_id: String,
}

impl PaymentRequestForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("period", rules::required(&self.period));
        errors.check("concept", rules::required(&self.concept));
        errors.check("amount", rules::required(&self.amount));
        errors.check("payerId", rules::required(&self.payer_id));
        errors.into_result()
    }

    /// Request body; the requester comes from the session
    pub fn to_draft(
        &self,
        requester: Option<String>,
        requester_id: Option<String>,
    ) -> Result<PaymentRequestDraft, ValidationErrors> {
        self.validate()?;
        Ok(PaymentRequestDraft {
            period: self.period.trim().to_string(),
            concept: self.concept.trim().to_string(),
            amount: self.amount.trim().to_string(),
            requester,
            requester_id,
            payer_id: non_empty(&self.payer_id),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorForm {
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub specialty: String,
    pub phone: String,
    pub address: Address,
}

impl DoctorForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("firstName", rules::required(&self.first_name));
        errors.check("lastName", rules::required(&self.last_name));
        errors.check("licenseNumber", rules::required(&self.license_number));
        errors.check("specialty", rules::required(&self.specialty));
        errors.into_result()
    }

    pub fn to_request(&self) -> Result<DoctorRequest, ValidationErrors> {
        self.validate()?;
        let phone = non_empty(&self.phone);
        let address = (!self.address.is_empty()).then(|| self.address.clone());
        let contact_info = (phone.is_some() || address.is_some())
            .then_some(ContactInfo { phone, address });
        Ok(DoctorRequest {
            license_number: non_empty(&self.license_number),
            specialty: non_empty(&self.specialty),
            full_name: Some(FullName {
                first_name: non_empty(&self.first_name),
                last_name: non_empty(&self.last_name),
            }),
            contact_info,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarerForm {
    pub dni: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl CarerForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("dni", rules::required(&self.dni));
        errors.check("fullName", rules::required(&self.full_name));
        errors.check("email", rules::email(&self.email));
        if !self.password.is_empty() {
            errors.check("password", rules::min_length(&self.password, PASSWORD_MIN));
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> Result<CarerRequest, ValidationErrors> {
        self.validate()?;
        Ok(CarerRequest {
            dni: non_empty(&self.dni),
            full_name: non_empty(&self.full_name),
            email: non_empty(&self.email),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyMemberForm {
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub linked_resident_id: String,
}

impl FamilyMemberForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("firstName", rules::required(&self.first_name));
        errors.check("relationship", rules::required(&self.relationship));
        errors.check("linkedResidentId", rules::integer(&self.linked_resident_id));
        errors.into_result()
    }

    pub fn to_request(&self) -> Result<FamilyMemberRequest, ValidationErrors> {
        self.validate()?;
        Ok(FamilyMemberRequest {
            relationship: non_empty(&self.relationship),
            linked_resident_id: self.linked_resident_id.trim().parse().ok(),
            full_name: Some(FullName {
                first_name: non_empty(&self.first_name),
                last_name: non_empty(&self.last_name),
            }),
        })
    }
}

//! Client-side validation
//!
//! - **rules**: primitive field checks (required, email, lengths, ranges, dates, times)
//! - **forms**: one model per screen form, validated as a whole and converted
//!   into the service request body

mod forms;
pub mod rules;

pub use forms::{
    AppointmentForm, CarerForm, DoctorForm, FamilyMemberForm, FoodEntryForm, LoginForm,
    PaymentRequestForm, ReceiptForm, RegisterForm, ResidentForm, NAME_MIN, PASSWORD_MIN,
};
pub use rules::{FieldError, Rule, ValidationErrors};

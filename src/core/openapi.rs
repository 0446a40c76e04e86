use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::appointments::{
    dtos as appointments_dtos, handlers as appointments_handlers, models as appointments_models,
};
use crate::features::auth;
use crate::features::employees::{dtos as employees_dtos, handlers as employees_handlers};
use crate::features::inspections::{
    dtos as inspections_dtos, handlers as inspections_handlers, models as inspections_models,
};
use crate::features::photos::{dtos as photos_dtos, models as photos_models};
use crate::features::profiles::{dtos as profiles_dtos, handlers as profiles_handlers};
use crate::features::steps::{
    dtos as steps_dtos, entity::ChildRecord, handlers as steps_handlers, models as steps_models,
};
use crate::features::wizard::{
    dtos as wizard_dtos, handlers as wizard_handlers, models as wizard_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::signup,
        auth::handlers::login,
        auth::handlers::refresh_token,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Profile
        profiles_handlers::get_profile,
        profiles_handlers::update_profile,
        // Team
        employees_handlers::list_employees,
        employees_handlers::create_employee,
        employees_handlers::get_employee,
        employees_handlers::update_employee,
        employees_handlers::delete_employee,
        employees_handlers::verify_employee_password,
        // Appointments
        appointments_handlers::list_appointments,
        appointments_handlers::create_appointment,
        appointments_handlers::get_appointment,
        appointments_handlers::update_appointment,
        appointments_handlers::delete_appointment,
        appointments_handlers::update_appointment_status,
        appointments_handlers::convert_appointment,
        // Inspections
        inspections_handlers::list_inspections,
        inspections_handlers::create_inspection,
        inspections_handlers::get_inspection,
        inspections_handlers::update_inspection,
        inspections_handlers::delete_inspection,
        inspections_handlers::save_signature,
        // Wizard
        wizard_handlers::get_wizard_state,
        wizard_handlers::next_step,
        wizard_handlers::previous_step,
        wizard_handlers::finalize,
        // Step entities
        steps_handlers::rooms::list,
        steps_handlers::rooms::create,
        steps_handlers::rooms::update,
        steps_handlers::rooms::delete,
        steps_handlers::meters::list,
        steps_handlers::meters::create,
        steps_handlers::meters::update,
        steps_handlers::meters::delete,
        steps_handlers::keys::list,
        steps_handlers::keys::create,
        steps_handlers::keys::update,
        steps_handlers::keys::delete,
        steps_handlers::private_areas::list,
        steps_handlers::private_areas::create,
        steps_handlers::private_areas::update,
        steps_handlers::private_areas::delete,
        steps_handlers::other_equipment::list,
        steps_handlers::other_equipment::create,
        steps_handlers::other_equipment::update,
        steps_handlers::other_equipment::delete,
        steps_handlers::energy_equipment::list,
        steps_handlers::energy_equipment::create,
        steps_handlers::energy_equipment::update,
        steps_handlers::energy_equipment::delete,
        steps_handlers::heating_equipment::list,
        steps_handlers::heating_equipment::create,
        steps_handlers::heating_equipment::update,
        steps_handlers::heating_equipment::delete,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::dtos::SignupRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::RefreshTokenRequestDto,
            auth::dtos::SessionDto,
            auth::dtos::AuthUserDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::SessionDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Profile
            profiles_dtos::UpdateProfileDto,
            profiles_dtos::ProfileResponseDto,
            ApiResponse<profiles_dtos::ProfileResponseDto>,
            // Team
            employees_dtos::CreateEmployeeDto,
            employees_dtos::UpdateEmployeeDto,
            employees_dtos::VerifyPasswordDto,
            employees_dtos::VerifyPasswordResponseDto,
            employees_dtos::EmployeeResponseDto,
            ApiResponse<employees_dtos::EmployeeResponseDto>,
            ApiResponse<Vec<employees_dtos::EmployeeResponseDto>>,
            ApiResponse<employees_dtos::VerifyPasswordResponseDto>,
            // Appointments
            appointments_models::AppointmentStatus,
            appointments_models::AppointmentFields,
            appointments_dtos::UpdateStatusDto,
            appointments_dtos::AppointmentResponseDto,
            appointments_dtos::ConversionResponseDto,
            ApiResponse<appointments_dtos::AppointmentResponseDto>,
            ApiResponse<Vec<appointments_dtos::AppointmentResponseDto>>,
            ApiResponse<appointments_dtos::ConversionResponseDto>,
            // Inspections
            inspections_models::TypeEtatDesLieux,
            inspections_models::TypeBien,
            inspections_models::StatutEtatDesLieux,
            inspections_models::GeneralFields,
            inspections_models::Signature,
            inspections_models::SignatureParty,
            inspections_dtos::UpdateInspectionDto,
            inspections_dtos::InspectionResponseDto,
            ApiResponse<inspections_dtos::InspectionResponseDto>,
            ApiResponse<Vec<inspections_dtos::InspectionResponseDto>>,
            // Photos
            photos_models::PhotoCategory,
            photos_models::PhotoAttachment,
            photos_dtos::NewPhotoRefDto,
            photos_dtos::PhotoSaveFormDto,
            // Wizard
            wizard_models::WizardStep,
            wizard_models::NotificationKind,
            wizard_models::Notification,
            wizard_dtos::StepPayloadDto,
            wizard_dtos::GeneralStepDto,
            wizard_dtos::FinalizeRequestDto,
            wizard_dtos::WizardStateDto,
            wizard_dtos::WizardTransitionDto,
            ApiResponse<wizard_dtos::WizardStateDto>,
            ApiResponse<wizard_dtos::WizardTransitionDto>,
            // Step entities
            steps_models::RoomEntry,
            steps_models::MeterType,
            steps_models::MeterReading,
            steps_models::KeySet,
            steps_models::PrivateArea,
            steps_models::OtherEquipment,
            steps_models::EnergyEquipment,
            steps_models::HeatingEquipment,
            ChildRecord<steps_models::RoomEntry>,
            ChildRecord<steps_models::MeterReading>,
            ChildRecord<steps_models::KeySet>,
            ChildRecord<steps_models::PrivateArea>,
            ChildRecord<steps_models::OtherEquipment>,
            ChildRecord<steps_models::EnergyEquipment>,
            ChildRecord<steps_models::HeatingEquipment>,
            steps_dtos::UpdateEntryDto<steps_models::RoomEntry>,
            steps_dtos::CollectionPayloadDto<steps_models::RoomEntry>,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "profile", description = "Profile of the signed-in account"),
        (name = "team", description = "Employees of the account"),
        (name = "appointments", description = "Appointment agenda and conversion to inspections"),
        (name = "inspections", description = "Inspections (états des lieux) and signatures"),
        (name = "wizard", description = "Step-by-step inspection wizard"),
        (name = "rooms", description = "Rooms of an inspection"),
        (name = "meters", description = "Meter readings"),
        (name = "keys", description = "Keys handed over"),
        (name = "private-areas", description = "Private areas (cellar, parking, garden)"),
        (name = "other-equipment", description = "Other equipment"),
        (name = "energy-equipment", description = "Energy equipment"),
        (name = "heating-equipment", description = "Heating equipment"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "EDL API",
        version = "0.1.0",
        description = "API documentation for the état des lieux service",
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` JWT scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

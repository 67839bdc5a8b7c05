// Every error enum defaults to its `Unknown` variant, so a value built
// without further context always reads as the generic failure.

use std::fmt::Debug;

use timesheet::modules::customizations::ports::CustomizationRepositoryError;
use timesheet::modules::customizations::use_cases::delete_customization::DeleteCustomizationError;
use timesheet::modules::customizations::use_cases::get_user_invoice_items::GetUserInvoiceItemsError;
use timesheet::modules::customizations::use_cases::update_customization::UpdateCustomizationError;
use timesheet::modules::entries::ports::EntryRepositoryError;
use timesheet::modules::entries::use_cases::get_week_entries::GetWeekEntriesError;
use timesheet::modules::entries::use_cases::update_week_entries::UpdateWeekEntriesError;
use timesheet::modules::exports::ports::ExportQueriesError;
use timesheet::modules::exports::use_cases::export_entries::ExportEntriesError;
use timesheet::modules::projects::ports::ProjectRepositoryError;
use timesheet::modules::projects::use_cases::create_project::CreateProjectError;
use timesheet::modules::projects::use_cases::delete_project::DeleteProjectError;
use timesheet::modules::projects::use_cases::list_projects::ListProjectsError;
use timesheet::modules::projects::use_cases::update_project::UpdateProjectError;
use timesheet::modules::users::ports::UserRepositoryError;
use timesheet::modules::users::use_cases::list_users::ListUsersError;
use timesheet::modules::users::use_cases::resolve_user::ResolveUserError;
use timesheet::modules::users::use_cases::update_user_permissions::UpdateUserPermissionsError;
use timesheet::shared::core::color::ParseColorError;

fn assert_defaults_to<E>(unknown: E)
where
    E: Default + PartialEq + Debug,
{
    assert_eq!(E::default(), unknown);
}

#[test]
fn it_should_default_every_use_case_error_to_unknown() {
    assert_defaults_to(ResolveUserError::Unknown);
    assert_defaults_to(GetWeekEntriesError::Unknown);
    assert_defaults_to(UpdateWeekEntriesError::Unknown);
    assert_defaults_to(ListProjectsError::Unknown);
    assert_defaults_to(CreateProjectError::Unknown);
    assert_defaults_to(UpdateProjectError::Unknown);
    assert_defaults_to(DeleteProjectError::Unknown);
    assert_defaults_to(GetUserInvoiceItemsError::Unknown);
    assert_defaults_to(UpdateCustomizationError::Unknown);
    assert_defaults_to(DeleteCustomizationError::Unknown);
    assert_defaults_to(ListUsersError::Unknown);
    assert_defaults_to(UpdateUserPermissionsError::Unknown);
    assert_defaults_to(ExportEntriesError::Unknown);
}

#[test]
fn it_should_default_every_port_error_to_unknown() {
    assert_defaults_to(UserRepositoryError::Unknown);
    assert_defaults_to(ProjectRepositoryError::Unknown);
    assert_defaults_to(EntryRepositoryError::Unknown);
    assert_defaults_to(CustomizationRepositoryError::Unknown);
    assert_defaults_to(ExportQueriesError::Unknown);
}

#[test]
fn it_should_default_the_color_parse_error_to_unknown() {
    assert_defaults_to(ParseColorError::Unknown);
}

// Crate entry point. Re-export modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.

pub mod config;

pub mod shared {
    pub mod core {
        pub mod color;
        pub mod permission;
        pub mod week;
    }
}

pub mod modules {
    pub mod users {
        pub mod core {
            pub mod user;
        }
        pub mod ports;
        pub mod adapters {
            pub mod in_memory;
        }
        pub mod use_cases {
            pub mod list_users;
            pub mod resolve_user;
            pub mod update_user_permissions;
        }
    }
    pub mod projects {
        pub mod core {
            pub mod project;
        }
        pub mod ports;
        pub mod adapters {
            pub mod in_memory;
        }
        pub mod use_cases {
            pub mod create_project;
            pub mod delete_project;
            pub mod list_projects;
            pub mod update_project;
        }
    }
    pub mod customizations {
        pub mod core {
            pub mod customization;
        }
        pub mod ports;
        pub mod adapters {
            pub mod in_memory;
        }
        pub mod use_cases {
            pub mod delete_customization;
            pub mod get_user_invoice_items;
            pub mod update_customization;
        }
    }
    pub mod entries {
        pub mod core {
            pub mod entry;
        }
        pub mod ports;
        pub mod adapters {
            pub mod in_memory;
        }
        pub mod use_cases {
            pub mod get_week_entries;
            pub mod update_week_entries;
        }
    }
    pub mod exports {
        pub mod core {
            pub mod row;
        }
        pub mod ports;
        pub mod adapters {
            pub mod in_memory;
        }
        pub mod use_cases {
            pub mod export_entries;
        }
    }
}

pub mod shell;

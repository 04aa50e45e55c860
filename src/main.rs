use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use colored::*;
use tracing::debug;

use crate::{
    api::{Api, http::HttpApi},
    config::Config,
    hierarchy::{HierarchyCommand, HierarchyView},
    prompt::TerminalPrompt,
    services::{
        Deletion,
        areas::{
            CreateAreaParameters, DeleteAreaParameters, RenameAreaParameters, create_area,
            delete_area, rename_area,
        },
        employees::{
            CreateEmployeeParameters, DeleteEmployeeParameters, ManagerChange,
            UpdateEmployeeParameters, create_employee, delete_employee, update_employee,
        },
    },
};

mod api;
mod config;
mod hierarchy;
mod logging;
mod models;
mod prompt;
mod services;
mod ui;

#[derive(Parser)]
#[command(
    name = "orgadmin",
    about = "Manage areas, employees and reporting lines from your terminal"
)]
struct Cli {
    /// Base URL of the organisation API (overrides config and ORGADMIN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage areas
    #[command(subcommand)]
    Area(AreaCommands),

    /// Manage employees
    #[command(subcommand)]
    Employee(EmployeeCommands),

    /// Show managers and their direct reports
    Hierarchy {
        /// Expand a manager's reports (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        expand: Vec<i64>,

        /// Toggle managers interactively
        #[arg(short, long)]
        interactive: bool,
    },
}

#[derive(Debug, Subcommand)]
enum AreaCommands {
    /// List all areas
    List,
    /// Show one area
    Show { id: i64 },
    /// Create a new area
    New { name: String },
    /// Rename an area
    Rename { id: i64, name: String },
    /// Delete an area
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum EmployeeCommands {
    /// List all employees
    List,
    /// Show one employee with their manager and reports
    Show { id: i64 },
    /// Create a new employee
    New {
        /// Full name
        name: String,

        /// Job title
        #[arg(short, long)]
        position: String,

        /// Area id
        #[arg(short, long)]
        area: i64,

        /// Direct manager id
        #[arg(short, long)]
        manager: Option<i64>,
    },
    /// Update an employee
    Update {
        id: i64,

        /// New full name
        #[arg(short, long)]
        name: Option<String>,

        /// New job title
        #[arg(short, long)]
        position: Option<String>,

        /// New area id
        #[arg(short, long)]
        area: Option<i64>,

        /// New direct manager id
        #[arg(short, long, conflicts_with = "no_manager")]
        manager: Option<i64>,

        /// Make the employee top-level
        #[arg(long)]
        no_manager: bool,
    },
    /// Delete an employee
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    let mut config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| fail(e));
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            fail("--timeout must be a positive number of seconds");
        }
        config.timeout_secs = timeout;
    }
    debug!(api_url = %config.api_url, timeout_secs = config.timeout_secs, "configuration loaded");

    let api = match HttpApi::new(&config.api_url, config.timeout()) {
        Ok(api) => Arc::new(api),
        Err(e) => fail(e),
    };

    match cli.command {
        Commands::Area(AreaCommands::List) => {
            let areas = api
                .list_areas()
                .unwrap_or_else(|e| fail(format!("Failed to load areas: {}", e)));

            if areas.is_empty() {
                println!("No areas found");
            } else {
                ui::render_view_header("Areas", areas.len(), "area", "areas");
                for area in &areas {
                    ui::render_area_line(area);
                }
                println!();
            }
        }
        Commands::Area(AreaCommands::Show { id }) => match api.get_area(id) {
            Ok(area) => ui::render_area_detail(&area),
            Err(e) if e.is_not_found() => fail(format!("Area #{} not found", id)),
            Err(e) => fail(format!("Failed to load area: {}", e)),
        },
        Commands::Area(AreaCommands::New { name }) => {
            match create_area(api.as_ref(), CreateAreaParameters { name }) {
                Ok(area) => println!("✓ Area {} created with id {}", area.name.bold(), area.id),
                Err(e) => fail(e),
            }
        }
        Commands::Area(AreaCommands::Rename { id, name }) => {
            match rename_area(api.as_ref(), RenameAreaParameters { id, name }) {
                Ok(area) => println!("✓ Area #{} renamed to {}", area.id, area.name.bold()),
                Err(e) => fail(e),
            }
        }
        Commands::Area(AreaCommands::Delete { id, yes }) => {
            let params = DeleteAreaParameters {
                id,
                skip_confirmation: yes,
            };
            match delete_area(api.as_ref(), &mut TerminalPrompt::stdio(), params) {
                Ok(Deletion::Deleted(area)) => println!("✓ Area deleted: {}", area.name),
                Ok(Deletion::Cancelled) => println!("Nothing deleted"),
                Err(e) => fail(e),
            }
        }
        Commands::Employee(EmployeeCommands::List) => {
            let employees = api
                .list_employees()
                .unwrap_or_else(|e| fail(format!("Failed to load employees: {}", e)));

            if employees.is_empty() {
                println!("No employees found");
            } else {
                ui::render_view_header("Employees", employees.len(), "employee", "employees");
                for employee in &employees {
                    ui::render_employee_line(employee);
                }
                println!();
            }
        }
        Commands::Employee(EmployeeCommands::Show { id }) => match api.get_employee(id) {
            Ok(employee) => ui::render_employee_detail(&employee),
            Err(e) if e.is_not_found() => fail(format!("Employee #{} not found", id)),
            Err(e) => fail(format!("Failed to load employee: {}", e)),
        },
        Commands::Employee(EmployeeCommands::New {
            name,
            position,
            area,
            manager,
        }) => {
            let params = CreateEmployeeParameters {
                name,
                position,
                area_id: area,
                manager_id: manager,
            };
            match create_employee(api.as_ref(), params) {
                Ok(employee) => println!(
                    "✓ Employee {} created with id {}",
                    employee.name.bold(),
                    employee.id
                ),
                Err(e) => fail(e),
            }
        }
        Commands::Employee(EmployeeCommands::Update {
            id,
            name,
            position,
            area,
            manager,
            no_manager,
        }) => {
            let params = UpdateEmployeeParameters {
                id,
                name,
                position,
                area_id: area,
                manager: ManagerChange::from_command_flags(manager, no_manager),
            };
            match update_employee(api.as_ref(), params) {
                Ok(employee) => println!("✓ Employee #{} updated", employee.id),
                Err(e) => fail(e),
            }
        }
        Commands::Employee(EmployeeCommands::Delete { id, yes }) => {
            let params = DeleteEmployeeParameters {
                id,
                skip_confirmation: yes,
            };
            match delete_employee(api.as_ref(), &mut TerminalPrompt::stdio(), params) {
                Ok(Deletion::Deleted(employee)) => {
                    println!("✓ Employee deleted: {}", employee.name);
                    if employee.is_manager() {
                        println!(
                            "  └─ they had {} direct report(s)",
                            employee.subordinates.len()
                        );
                    }
                }
                Ok(Deletion::Cancelled) => println!("Nothing deleted"),
                Err(e) => fail(e),
            }
        }
        Commands::Hierarchy {
            expand,
            interactive,
        } => {
            let mut view = HierarchyView::mount(Arc::clone(&api));
            view.wait();

            for id in view.expand(&expand) {
                eprintln!("Warning: #{} is not a manager, nothing to expand", id);
            }

            if interactive {
                run_interactive(&mut view, &api, io::stdin().lock(), &mut io::stderr())
                    .unwrap_or_else(|e| fail(format!("Failed to read input: {}", e)));
            } else {
                ui::render_hierarchy(&view);
            }
        }
    }
}

/// Render, read one command, apply it; until `q` or end of input.
/// The prompt and notices go to `notices`.
fn run_interactive<A>(
    view: &mut HierarchyView,
    api: &Arc<A>,
    mut input: impl BufRead,
    notices: &mut impl Write,
) -> io::Result<()>
where
    A: Api + Send + Sync + 'static,
{
    loop {
        ui::render_hierarchy(view);
        write!(notices, "{} ", "id to toggle, r to refresh, q to quit >".dimmed())?;
        notices.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(notices)?;
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<HierarchyCommand>() {
            Ok(HierarchyCommand::Quit) => return Ok(()),
            Ok(HierarchyCommand::Refresh) => {
                view.refresh(Arc::clone(api));
                view.wait();
            }
            Ok(HierarchyCommand::Toggle(id)) => {
                if view.toggle(id).is_none() {
                    writeln!(notices, "#{} is not a manager", id)?;
                }
            }
            Err(e) => writeln!(notices, "{}", e)?,
        }
    }
}

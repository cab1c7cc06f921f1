use clap::Subcommand;
use shiftgrid_core::Config;

#[derive(Subcommand)]
pub enum EmployeesAction {
    /// List configured employees
    List {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: EmployeesAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        EmployeesAction::List { json } => {
            let roster = config.roster();
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else if roster.is_empty() {
                println!("No employees configured. Use 'config set employees <json>' to add some.");
            } else {
                for employee in roster.iter() {
                    println!(
                        "{:<12} {:<3} {:<8} {}",
                        employee.id, employee.initial, employee.color, employee.name
                    );
                }
            }
        }
    }
    Ok(())
}

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jscorp-hr", version)]
#[command(about = "JSCORP HR administration from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show, change or probe the API base URL
    #[command(subcommand)]
    Endpoint(EndpointCommand),
    /// Sign in and keep the token for later commands
    Login(LoginArgs),
    /// Forget the stored token
    Logout,
    /// Endpoint and session state
    Status,
    /// Current account (and all accounts, for the administrator)
    Whoami,
    /// Load everything and print the headline figures
    Dashboard {
        /// Attendance month, `YYYYMM`; defaults to the current month
        #[arg(long)]
        year_month: Option<String>,
    },
    /// List employees
    Employees,
    /// List departments
    Departments,
    /// Pay runs and their results
    #[command(subcommand)]
    Payroll(PayrollCommand),
    /// Monthly attendance summaries
    Attendance {
        /// `YYYYMM`; defaults to the current month
        #[arg(long)]
        year_month: Option<String>,
    },
    /// List leave requests
    Leave,
    /// Ask the backend to start a password reset
    PasswordReset { username: String },
    /// Change the signed-in account's password
    ChangePassword(ChangePasswordArgs),
}

#[derive(Subcommand, Debug)]
pub enum EndpointCommand {
    /// Print the base URL in use and where it came from
    Show,
    /// Store an override that wins over every other source
    Set { url: String },
    /// Remove the stored override
    Clear,
    /// Probe `<url>/health`; defaults to the base URL in use
    Test { url: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum PayrollCommand {
    /// List pay runs, newest first
    Runs,
    /// Results of one pay run
    Results { run_id: i64 },
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long, short)]
    pub username: String,
    /// Read from stdin when omitted
    #[arg(long, env = "JSCORP_HR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChangePasswordArgs {
    /// Read from stdin when omitted
    #[arg(long)]
    pub current: Option<String>,
    /// Read from stdin when omitted
    #[arg(long)]
    pub new: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn cli_requires_subcommand() {
        let err = match Cli::try_parse_from(["jscorp-hr"]) {
            Ok(_) => panic!("expected missing subcommand parse error"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand);
    }

    #[test]
    fn login_requires_username() {
        let err = Cli::try_parse_from(["jscorp-hr", "login"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn nested_subcommands_parse() {
        let cli = Cli::try_parse_from(["jscorp-hr", "payroll", "results", "7"]).unwrap();
        assert!(matches!(cli.command, Command::Payroll(PayrollCommand::Results { run_id: 7 })));

        let cli = Cli::try_parse_from(["jscorp-hr", "endpoint", "test"]).unwrap();
        assert!(matches!(cli.command, Command::Endpoint(EndpointCommand::Test { url: None })));

        let cli = Cli::try_parse_from(["jscorp-hr", "attendance", "--year-month", "202503"]).unwrap();
        match cli.command {
            Command::Attendance { year_month } => assert_eq!(year_month.as_deref(), Some("202503")),
            other => panic!("unexpected {other:?}"),
        }
    }
}

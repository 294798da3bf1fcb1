//! Command handlers. API failures land on the notice board; anything else
//! (stdin, storage setup) bubbles up as `anyhow::Error`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use jscorp_client::bootstrap::current_year_month;
use jscorp_client::gateway::reset_link;
use jscorp_client::resolver::{clear_override, save_override};
use jscorp_client::{
    EndpointResolver, FileStore, Gateway, Notice, NoticeBoard, Origin, ResolvedEndpoint, Session, Snapshot,
};
use jscorp_common::config::ClientConfig;
use jscorp_common::models::{Employee, PayResult};

use crate::cli::{ChangePasswordArgs, Command, EndpointCommand, LoginArgs, PayrollCommand};

pub struct Console {
    config: ClientConfig,
    store: Arc<FileStore>,
    endpoint: ResolvedEndpoint,
    gateway: Gateway,
    board: NoticeBoard,
}

impl Console {
    pub fn open(config: ClientConfig) -> anyhow::Result<Self> {
        let store = Arc::new(FileStore::new(config.storage.resolved_path()));
        tracing::debug!("Client storage at {}", store.path().display());

        let endpoint = EndpointResolver::from_config(&config).resolve_with_store(&*store, &config.api);
        let session = Session::load(store.clone());
        let gateway = Gateway::new(endpoint.base_url.clone(), session, config.timeouts)?;
        Ok(Self { config, store, endpoint, gateway, board: NoticeBoard::default() })
    }

    /// Latest failure, if the command produced one.
    pub fn notice(&self) -> Option<&Notice> {
        self.board.latest()
    }

    pub async fn run(&mut self, command: Command) -> anyhow::Result<()> {
        let base = self.gateway.base_url().to_owned();
        let (origin, result) = match command {
            Command::Endpoint(cmd) => (Origin::Action, self.endpoint(cmd).await),
            Command::Login(args) => {
                let password = match args.password.clone() {
                    Some(p) => p,
                    None => prompt("Password")?,
                };
                (Origin::Login, self.login(&args, &password).await)
            }
            Command::Logout => {
                self.gateway.logout();
                println!("Logged out");
                return Ok(());
            }
            Command::Status => {
                self.status();
                return Ok(());
            }
            Command::Whoami => (Origin::Background, self.whoami().await),
            Command::Dashboard { year_month } => {
                self.dashboard(year_month.unwrap_or_else(current_year_month)).await;
                return Ok(());
            }
            Command::Employees => (Origin::Background, self.employees().await),
            Command::Departments => (Origin::Background, self.departments().await),
            Command::Payroll(cmd) => (Origin::Background, self.payroll(cmd).await),
            Command::Attendance { year_month } => {
                let ym = year_month.unwrap_or_else(current_year_month);
                (Origin::Background, self.attendance(&ym).await)
            }
            Command::Leave => (Origin::Background, self.leave().await),
            Command::PasswordReset { username } => (Origin::Action, self.password_reset(&username).await),
            Command::ChangePassword(args) => {
                let (current, new) = passwords(args)?;
                (Origin::Action, self.gateway.change_password(&current, &new).await.map(|()| {
                    println!("Password changed");
                }))
            }
        };

        if let Err(e) = result {
            self.board.report(&e, origin, &base);
        }
        Ok(())
    }

    // ── Endpoint ──────────────────────────────────────────────────────────────

    async fn endpoint(&self, cmd: EndpointCommand) -> jscorp_client::Result<()> {
        match cmd {
            EndpointCommand::Show => {
                println!("{} ({})", self.endpoint.base_url, self.endpoint.source.label());
            }
            EndpointCommand::Set { url } => {
                let stored = save_override(&*self.store, &url)?;
                println!("API base set to {stored}; used from the next command on");
            }
            EndpointCommand::Clear => {
                clear_override(&*self.store)?;
                println!("API base override removed");
            }
            EndpointCommand::Test { url } => {
                let candidate = url.unwrap_or_else(|| self.endpoint.base_url.clone());
                let base = self.gateway.test_connection(&candidate).await?;
                println!("{base} is reachable");
            }
        }
        Ok(())
    }

    // ── Session ───────────────────────────────────────────────────────────────

    async fn login(&self, args: &LoginArgs, password: &str) -> jscorp_client::Result<()> {
        // Free-tier backends sleep; start waking it while the login is in flight.
        drop(self.gateway.warm_up());
        self.gateway.login(&args.username, password).await?;
        println!("Logged in to {}", self.gateway.base_url());
        Ok(())
    }

    fn status(&self) {
        println!("API base: {} ({})", self.endpoint.base_url, self.endpoint.source.label());
        println!("Session:  {:?}", self.gateway.session().state());
        println!("Storage:  {}", self.store.path().display());
    }

    async fn whoami(&self) -> jscorp_client::Result<()> {
        let me = self.gateway.current_user().await?;
        println!("{} (id {}){}", me.username, me.id, if me.is_active { "" } else { " [inactive]" });
        let users = self.gateway.list_users_if_admin(Some(&me)).await;
        for user in &users {
            println!("  {:>4}  {}", user.id, user.username);
        }
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    async fn dashboard(&mut self, year_month: String) {
        if let Err(e) = self.gateway.require_session() {
            self.board.report(&e, Origin::Background, self.gateway.base_url());
            return;
        }
        let snapshot = match self.gateway.bootstrap(&year_month).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                if let Some(first) = e.first() {
                    self.board.report(first, Origin::Background, self.gateway.base_url());
                }
                e.partial
            }
        };
        print_snapshot(&snapshot, &year_month);
    }

    async fn employees(&self) -> jscorp_client::Result<()> {
        for emp in self.gateway.list_employees().await? {
            print_employee(&emp);
        }
        Ok(())
    }

    async fn departments(&self) -> jscorp_client::Result<()> {
        for dept in self.gateway.list_departments().await? {
            println!("{:>4}  {:<8} {}", dept.id, dept.code, dept.name);
        }
        Ok(())
    }

    async fn payroll(&self, cmd: PayrollCommand) -> jscorp_client::Result<()> {
        match cmd {
            PayrollCommand::Runs => {
                for run in self.gateway.list_pay_runs().await? {
                    println!(
                        "{:>4}  group {:<4} {}  {:<10} {}",
                        run.id, run.pay_group_id, run.year_month, run.run_type, run.status
                    );
                }
            }
            PayrollCommand::Results { run_id } => {
                for result in self.gateway.pay_results(run_id).await? {
                    print_pay_result(&result);
                }
            }
        }
        Ok(())
    }

    async fn attendance(&self, year_month: &str) -> jscorp_client::Result<()> {
        for row in self.gateway.monthly_attendance(year_month).await? {
            println!(
                "emp {:<6} worked {:>8}h  overtime {:>6}h  late {}  absent {}",
                row.emp_id, row.worked_hours, row.overtime_hours, row.late_count, row.absence_count
            );
        }
        Ok(())
    }

    async fn leave(&self) -> jscorp_client::Result<()> {
        for req in self.gateway.list_leave_requests().await? {
            println!(
                "{:>4}  emp {:<6} {:<8} {} → {}  {}h  {}",
                req.id,
                req.emp_id,
                req.leave_type,
                req.start_datetime.format("%Y-%m-%d %H:%M"),
                req.end_datetime.format("%Y-%m-%d %H:%M"),
                req.hours,
                req.status
            );
        }
        Ok(())
    }

    // ── Passwords ─────────────────────────────────────────────────────────────

    async fn password_reset(&self, username: &str) -> jscorp_client::Result<()> {
        match self.gateway.request_password_reset(username).await? {
            Some(token) => {
                let page = self.config.api.page_origin.as_deref().unwrap_or(self.gateway.base_url());
                match reset_link(page, &token) {
                    Some(link) => println!("Reset link: {link}"),
                    None => println!("Reset token: {token}"),
                }
            }
            None => println!("Reset requested; check the account's email"),
        }
        Ok(())
    }
}

fn passwords(args: ChangePasswordArgs) -> anyhow::Result<(String, String)> {
    let current = match args.current {
        Some(p) => p,
        None => prompt("Current password")?,
    };
    let new = match args.new {
        Some(p) => p,
        None => prompt("New password")?,
    };
    Ok((current, new))
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

// ── Output ───────────────────────────────────────────────────────────────────

fn print_employee(emp: &Employee) {
    println!("{:<8} {:<24} {:<9} {}", emp.emp_no, emp.full_name(), emp.status, emp.email);
}

fn print_pay_result(result: &PayResult) {
    println!(
        "emp {:<6} gross {:>14}  deduct {:>14}  net {:>14} {}",
        result.emp_id, result.gross_amount, result.deduct_amount, result.net_amount, result.currency
    );
}

fn print_snapshot(snapshot: &Snapshot, year_month: &str) {
    if let Some(me) = &snapshot.current_user {
        println!("Signed in as {}", me.username);
    }
    if let Some(stats) = &snapshot.stats {
        println!(
            "Employees {} ({} active) · departments {} · pay groups {} · pay runs {} · pending leave {}",
            stats.total_employees,
            stats.active_employees,
            stats.department_count,
            stats.pay_group_count,
            stats.pay_run_count,
            stats.leave_requests_pending
        );
    }
    println!(
        "Loaded {} employees, {} departments, {} pay items, {} work types, {} leave requests",
        snapshot.employees.len(),
        snapshot.departments.len(),
        snapshot.pay_items.len(),
        snapshot.work_types.len(),
        snapshot.leave_requests.len()
    );
    println!("Attendance {year_month}: {} summaries", snapshot.attendance.len());
    if let Some(run) = snapshot.selected_run {
        println!("Latest pay run #{run}:");
        for result in &snapshot.pay_results {
            print_pay_result(result);
        }
    }
}

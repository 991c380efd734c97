//! Simulated `rhui-manager` speaking over an in-memory duplex stream.
//!
//! The fake keeps its state in a [`World`] shared with the test, answers the
//! same prompts as the real console, treats Ctrl-C as "abort the current
//! question", leaves a screen on `home` and ends when `q` is entered at any
//! prompt.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rhuictl::application::navigator::wait_for_top_level;
use rhuictl::domain::Cds;
use rhuictl::domain::Screen;
use rhuictl::domain::cds::DEFAULT_CDS_SSH_KEY;
use rhuictl::domain::config::{LoginConfig, Timeouts};
use rhuictl::infra::session::Session;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};

pub type TestSession = Session<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

const HOME_MENU: &str = "\n\
------------------------------------------------------------------------------\n\
             -= Red Hat Update Infrastructure Management Tool =-\n\
\n\
-= Home =-\n\
\n\
   r   manage repositories\n\
   c   manage content delivery servers (CDS)\n\
   n   manage Red Hat entitlement certificates\n\
\n\
   q   quit\n\
\n\
------------------------------------------------------------------------------\n";

/// How the fake answers a certificate upload.
#[derive(Debug, Clone)]
pub enum Certificate {
    Valid { product: String, file: String },
    Expired,
    Incompatible,
}

/// A custom repository as the fake recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeRepo {
    pub id: String,
    pub name: String,
    pub path: String,
    pub entitlement: Option<String>,
    pub gpg_check: bool,
    pub redhat_gpg: bool,
    pub custom_gpg: Option<String>,
}

/// Everything the fake console knows, shared with the test.
#[derive(Debug, Default)]
pub struct World {
    /// Credentials the console asks for before the home prompt.
    pub login: Option<(String, String)>,
    /// SSH keys that exist on the console host.
    pub key_files: Vec<String>,
    pub cdses: Vec<Cds>,
    pub rh_entitlements: Vec<(String, String)>,
    pub certificates: Vec<(String, Certificate)>,
    pub red_hat_repos: Vec<String>,
    pub repos: Vec<FakeRepo>,
    /// Quirk: served paths get this prefix, so summaries differ from requests.
    pub path_prefix: Option<String>,
    /// Screens whose key the fake pretends not to know.
    pub unreachable: Vec<Screen>,
    /// Every token received, `^C` for interrupts.
    pub received: Vec<String>,
    /// Answers given to Proceed/Continue questions, `^C` when interrupted.
    pub confirmations: Vec<String>,
    /// Screens ignore `home`.
    pub home_ignored: bool,
    /// After the first interrupt the console reads input but never answers.
    pub hang_on_interrupt: bool,
    /// Set once the console has ended and closed its output.
    pub finished: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            key_files: vec![DEFAULT_CDS_SSH_KEY.to_string()],
            red_hat_repos: vec!["Red Hat Update Infrastructure 3 (RPMs) (Yum)".to_string()],
            ..Self::default()
        }
    }
}

pub type Shared = Arc<Mutex<World>>;

/// Starts the fake and returns the client session plus the shared world.
pub fn start(world: World, timeouts: Timeouts) -> (TestSession, Shared) {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let shared = Arc::new(Mutex::new(world));

    let (reader, writer) = tokio::io::split(server);
    let fake = Fake {
        input: Input {
            reader,
            pending: Vec::new(),
        },
        out: writer,
        world: Arc::clone(&shared),
    };
    tokio::spawn(fake.run());

    let (reader, writer) = tokio::io::split(client);
    (Session::new(reader, writer, timeouts), shared)
}

/// Waits until the console has ended, so everything it read is recorded.
pub async fn finished(world: &Shared) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !world.lock().unwrap().finished {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("fake console did not end");
}

/// Timeouts for dialogues that are expected to succeed.
pub fn patient() -> Timeouts {
    Timeouts::uniform(Duration::from_secs(5))
}

/// Starts the fake and waits for the home prompt.
pub async fn ready(world: World) -> (TestSession, Shared) {
    let (mut session, shared) = start(world, patient());
    wait_for_top_level(&mut session, &LoginConfig::default())
        .await
        .expect("home prompt");
    (session, shared)
}

enum Token {
    Line(String),
    Interrupt,
}

struct Input<R> {
    reader: R,
    pending: Vec<u8>,
}

impl<R: AsyncRead + Unpin> Input<R> {
    async fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(pos) = self.pending.iter().position(|b| *b == b'\n' || *b == 0x03) {
                let raw: Vec<u8> = self.pending.drain(..=pos).collect();
                if raw[pos] == 0x03 {
                    return Some(Token::Interrupt);
                }
                let line = String::from_utf8_lossy(&raw[..pos]);
                return Some(Token::Line(line.trim_end_matches('\r').to_string()));
            }
            let mut buf = [0u8; 1024];
            match self.reader.read(&mut buf).await {
                Ok(0) | Err(_) => return None,
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
            }
        }
    }
}

/// Why a dialogue stopped early.
enum Stop {
    Abort,
    Eof,
}

type Step<T> = Result<T, Stop>;

struct Fake {
    input: Input<ReadHalf<DuplexStream>>,
    out: WriteHalf<DuplexStream>,
    world: Shared,
}

impl Fake {
    fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap()
    }

    async fn run(mut self) {
        let _ = self.session().await;
        let _ = self.out.shutdown().await;
        self.world().finished = true;
    }

    async fn say(&mut self, text: &str) -> Step<()> {
        self.out
            .write_all(text.as_bytes())
            .await
            .map_err(|_| Stop::Eof)
    }

    async fn line(&mut self) -> Step<String> {
        let token = self.input.next().await;
        let (label, step) = match token {
            Some(Token::Line(line)) => (line.clone(), Ok(line)),
            Some(Token::Interrupt) => ("^C".to_string(), Err(Stop::Abort)),
            None => return Err(Stop::Eof),
        };
        let hang = self.world().hang_on_interrupt;
        if hang && label == "^C" {
            self.world().received.push(label);
            while let Some(token) = self.input.next().await {
                if let Token::Line(line) = token {
                    self.world().received.push(line);
                }
            }
            return Err(Stop::Eof);
        }
        self.world().received.push(label);
        step
    }

    async fn ask(&mut self, prompt: &str) -> Step<String> {
        self.say(prompt).await?;
        self.line().await
    }

    /// Asks a y/n confirmation and records the answer.
    async fn confirm(&mut self, question: &str) -> Step<bool> {
        self.say(question).await?;
        let answer = self.line().await;
        let label = match &answer {
            Ok(a) => a.clone(),
            Err(Stop::Abort) => "^C".to_string(),
            Err(Stop::Eof) => return Err(Stop::Eof),
        };
        self.world().confirmations.push(label);
        Ok(answer? == "y")
    }

    async fn yes_no(&mut self, question: &str) -> Step<bool> {
        Ok(self.ask(question).await? == "y")
    }

    async fn session(&mut self) -> Step<()> {
        let login = self.world().login.clone();
        if let Some((user, password)) = login {
            let given_user = self.ask("RHUI Username: ").await?;
            let given_password = self.ask("RHUI Password: ").await?;
            if given_user != user || given_password != password {
                self.say("Invalid login, please try again\n").await?;
                return Ok(());
            }
        }

        loop {
            self.say(HOME_MENU).await?;
            self.say("rhui => ").await?;
            let key = match self.line().await {
                Ok(key) => key,
                Err(Stop::Abort) => continue,
                Err(Stop::Eof) => return Ok(()),
            };
            if key == "q" {
                return Ok(());
            }
            let unreachable = self.world().unreachable.clone();
            let screen = Screen::ALL
                .into_iter()
                .find(|s| s.key() == key && !unreachable.contains(s));
            match screen {
                Some(screen) => self.screen(screen).await?,
                None => self.say("Invalid option\n").await?,
            }
        }
    }

    async fn screen(&mut self, screen: Screen) -> Step<()> {
        loop {
            self.say(&format!("rhui ({}) => ", screen.name())).await?;
            let key = match self.line().await {
                Ok(key) => key,
                Err(Stop::Abort) => continue,
                Err(Stop::Eof) => return Err(Stop::Eof),
            };
            let home_ignored = self.world().home_ignored;
            let outcome = match (screen, key.as_str()) {
                (_, "q") => return Err(Stop::Eof),
                (_, "home") if !home_ignored => return Ok(()),
                (_, "l") => self.listing(screen).await,
                (Screen::Cds, "a") => self.add_cds().await,
                (Screen::Cds, "d") => self.delete_cds().await,
                (Screen::Entitlements, "c") => self.custom_entitlements().await,
                (Screen::Entitlements, "u") => self.upload().await,
                (Screen::Repo, "c") => self.create_repo().await,
                _ => self.say("Invalid option\n").await,
            };
            if let Err(Stop::Eof) = outcome {
                return Err(Stop::Eof);
            }
        }
    }

    // ── Listings ──────────────────────────────────────────────────────────────

    async fn listing(&mut self, screen: Screen) -> Step<()> {
        let text = match screen {
            Screen::Cds => self.cds_listing(),
            Screen::Entitlements => self.entitlement_listing(),
            Screen::Repo => self.repo_listing(),
            other => format!("\n-= {} =-\n\n  (nothing to list)\n\n", other.name()),
        };
        self.say(&text).await
    }

    fn cds_listing(&self) -> String {
        let world = self.world();
        let mut text = String::from("\n-= Content Delivery Server (CDS) Instances =-\n\n");
        if world.cdses.is_empty() {
            text.push_str("No CDS instances are registered.\n");
        }
        for cds in &world.cdses {
            text.push_str(&format!(
                "  {host}\n    Hostname:          {host}\n    SSH Username:      {user}\n    SSH Private Key:   {key}\n\n",
                host = cds.host_name,
                user = cds.user_name,
                key = cds.ssh_key_path,
            ));
        }
        text.push_str("------------------------------------------------------------------------------\n");
        text
    }

    fn rh_entitlement_block(entitlements: &[(String, String)]) -> String {
        let mut text = String::from("\nRed Hat Entitlements\n\n  \x1b[92mValid\x1b[0m\n");
        for (product, file) in entitlements {
            text.push_str(&format!(
                "    {product}\n      Expiration: 01-01-2030   Certificate: {file}\n"
            ));
        }
        text.push('\n');
        text
    }

    fn entitlement_listing(&self) -> String {
        let world = self.world();
        let mut text = Self::rh_entitlement_block(&world.rh_entitlements);
        text.push_str("Custom Repository Entitlements\n\n");
        for repo in &world.repos {
            if let Some(path) = &repo.entitlement {
                text.push_str(&format!("  Name: {}\n  Path: {path}\n\n", repo.name));
            }
        }
        text
    }

    fn repo_listing(&self) -> String {
        let world = self.world();
        let mut text = String::from("\n-= Repositories =-\n\nRed Hat Repositories\n  ---\n");
        for name in &world.red_hat_repos {
            text.push_str(&format!("  {name}\n"));
        }
        text.push_str("\nCustom Repositories\n  ---\n");
        if world.repos.is_empty() {
            text.push_str("  (None)\n");
        }
        for repo in &world.repos {
            text.push_str(&format!("  {}\n", repo.name));
        }
        text.push('\n');
        text
    }

    // ── CDS dialogues ─────────────────────────────────────────────────────────

    async fn add_cds(&mut self) -> Step<()> {
        let host = self.ask("Hostname of the CDS instance to register:\n").await?;
        let exists = self.world().cdses.iter().any(|c| c.host_name == host);
        if exists
            && !self
                .confirm(
                    "A Content Delivery Server instance with that hostname exists in the RHUI database.\n\
                     Continue? (y/n): ",
                )
                .await?
        {
            return Ok(());
        }

        let user = self
            .ask(&format!("Username with SSH access to {host} and sudo privileges:\n"))
            .await?;
        let key_question =
            format!("Absolute path to an SSH private key to log into {host} as {user}:\n");
        let mut key = self.ask(&key_question).await?;
        loop {
            let known = self.world().key_files.contains(&key);
            if known {
                break;
            }
            self.say("Cannot find file, please enter a valid path.\n").await?;
            key = self.ask(&key_question).await?;
        }

        let summary = format!(
            "The following CDS instance will be registered:\n  Hostname:         {host}\n  \
             SSH Username:     {user}\n  SSH Private Key:  {key}\nProceed? (y/n) "
        );
        if !self.confirm(&summary).await? {
            return Ok(());
        }

        {
            let mut world = self.world();
            let cds = Cds::new(host.clone()).with_user(user).with_ssh_key(key);
            match world.cdses.iter_mut().find(|c| c.host_name == host) {
                Some(existing) => *existing = cds,
                None => world.cdses.push(cds),
            }
        }
        self.say("Installing the CDS packages...\nThe CDS was successfully configured.\n")
            .await
    }

    async fn delete_cds(&mut self) -> Step<()> {
        let hosts: Vec<String> = self.world().cdses.iter().map(|c| c.host_name.clone()).collect();
        let mut selected = vec![false; hosts.len()];
        loop {
            let mut menu = String::from("Select one or more CDS instances to unregister:\n");
            for (i, host) in hosts.iter().enumerate() {
                let mark = if selected[i] { "x" } else { "-" };
                menu.push_str(&format!("  {mark}  {} : {host}\n", i + 1));
            }
            menu.push_str(&format!(
                "Enter value (1-{}) to toggle selection, 'c' to confirm selections, or '?' for more commands: ",
                hosts.len()
            ));
            let answer = self.ask(&menu).await?;
            if answer == "c" {
                break;
            }
            if let Ok(n) = answer.parse::<usize>()
                && (1..=hosts.len()).contains(&n)
            {
                selected[n - 1] = !selected[n - 1];
            }
        }

        let chosen: Vec<String> = hosts
            .into_iter()
            .zip(selected)
            .filter_map(|(host, on)| on.then_some(host))
            .collect();
        let mut summary = String::from("The following CDS instances will be unregistered:\n");
        for host in &chosen {
            summary.push_str(&format!("  {host}\n"));
        }
        summary.push_str("Proceed? (y/n) ");
        if !self.confirm(&summary).await? {
            return Ok(());
        }

        self.world().cdses.retain(|c| !chosen.contains(&c.host_name));
        for host in &chosen {
            self.say(&format!("Unregistered {host}\n")).await?;
        }
        Ok(())
    }

    // ── Entitlement dialogues ─────────────────────────────────────────────────

    async fn custom_entitlements(&mut self) -> Step<()> {
        let text = {
            let world = self.world();
            let mut text = String::from("\nCustom Repository Entitlements\n\n");
            for repo in &world.repos {
                if let Some(path) = &repo.entitlement {
                    text.push_str(&format!("  Name: {}\n  Path: {path}\n\n", repo.name));
                }
            }
            text
        };
        self.say(&text).await
    }

    async fn upload(&mut self) -> Step<()> {
        let path = self.ask("Full path to the new content certificate:\n").await?;
        let summary = format!(
            "The RHUI will be updated with the following certificate:\n  {path}\nProceed? (y/n) "
        );
        if !self.confirm(&summary).await? {
            return Ok(());
        }

        let certificate = self
            .world()
            .certificates
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, c)| c.clone());
        match certificate {
            Some(Certificate::Valid { product, file }) => {
                let listing = {
                    let mut world = self.world();
                    world.rh_entitlements = vec![(product, file)];
                    Self::rh_entitlement_block(&world.rh_entitlements)
                };
                self.say(&listing).await
            }
            Some(Certificate::Incompatible) => {
                self.say("The provided certificate is not compatible with the RHUI.\n")
                    .await
            }
            Some(Certificate::Expired) | None => {
                self.say("The provided certificate is expired or invalid.\n")
                    .await
            }
        }
    }

    // ── Repository dialogues ──────────────────────────────────────────────────

    async fn create_repo(&mut self) -> Step<()> {
        let id = self
            .ask("Unique ID for the custom repository (alphanumerics, _, and - only):\n")
            .await?;
        let name = self
            .ask(&format!("Display name for the custom repository [{id}]:\n"))
            .await?;
        let name = if name.is_empty() { id.clone() } else { name };
        let path = self
            .ask(&format!("Path at which the repository will be served [{id}]:\n"))
            .await?;
        let mut path = if path.is_empty() { id.clone() } else { path };
        let prefix = self.world().path_prefix.clone();
        if let Some(prefix) = prefix {
            path = format!("{prefix}/{path}");
        }

        self.ask(
            "Select checksum type to be used for this repository:\n  1 - sha256\n  2 - sha1\n\
             Enter value (1-2) or 'b' to abort: ",
        )
        .await?;

        let entitlement = if self
            .yes_no("Should the repository require an entitlement certificate to access? (y/n) ")
            .await?
        {
            let guess = guess_basearch(&path);
            let given = self
                .ask(&format!(
                    "Path that should be used when granting an entitlement for this repository [{guess}]:\n"
                ))
                .await?;
            Some(if given.is_empty() { guess } else { given })
        } else {
            None
        };

        let gpg_check = self
            .yes_no(
                "Should the repository require clients to perform a GPG check and verify \
                 packages are signed by a GPG key? (y/n) ",
            )
            .await?;
        let mut redhat_gpg = false;
        let mut custom_gpg = None;
        if gpg_check {
            redhat_gpg = self
                .yes_no("Will the repository be used to host any Red Hat GPG signed content? (y/n) ")
                .await?;
            if self
                .yes_no("Will the repository be used to host any custom GPG signed content? (y/n) ")
                .await?
            {
                custom_gpg = Some(
                    self.ask("Enter the absolute path to the public key of the GPG keypair:\n")
                        .await?,
                );
                self.ask("Would you like to enter another public key? (y/n) ")
                    .await?;
            }
        }

        let mut summary = format!(
            "The following repository will be created:\n  ID:               {id}\n  \
             Name:             {name}\n  Path:             {path}\n"
        );
        if let Some(entitlement) = &entitlement {
            summary.push_str(&format!("  Entitlement:      {entitlement}\n"));
        }
        summary.push_str(&format!(
            "  GPG Check         {}\n  Red Hat GPG Key:  {}\n  Custom GPG Keys:  {}\nProceed? (y/n) ",
            yes_no(gpg_check),
            yes_no(redhat_gpg),
            custom_gpg
                .as_ref()
                .map_or_else(|| "(None)".to_string(), |k| format!("'{k}'")),
        ));
        if !self.confirm(&summary).await? {
            return Ok(());
        }

        self.world().repos.push(FakeRepo {
            id,
            name: name.clone(),
            path,
            entitlement,
            gpg_check,
            redhat_gpg,
            custom_gpg,
        });
        self.say(&format!("Successfully created repository \"{name}\"\n"))
            .await
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// The console's entitlement guess, written out longhand.
fn guess_basearch(path: &str) -> String {
    let arches = path.matches("x86_64").count() + path.matches("i386").count();
    if arches == 1 {
        path.replace("x86_64", "$basearch").replace("i386", "$basearch")
    } else {
        path.to_string()
    }
}

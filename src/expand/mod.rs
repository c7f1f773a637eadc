mod config;
mod controller;
mod drive_group;
mod notify;
mod skip;
mod steps;
mod submit;
mod tasks;
pub mod ui;
mod widgets;

pub use config::{DashboardConfig, ExpandConfig, GeneralConfig, OsdConfig, DEFAULT_CONFIG_PATH};
pub use controller::{Advance, Retreat, WizardController};
pub use drive_group::{service_name, DeviceSelection, DeviceType, DriveGroup};
pub use notify::{Notification, NotificationType, Outbox, Route};
pub use skip::{SkipDialog, SkipFlow, SKIP_DIALOG};
pub use steps::{StepId, StepResult, WizardStep, WizardSteps};
pub use submit::{
    strip_label, HostPhase, HostUpdateOutcome, OsdOutcome, SubmissionOrchestrator,
    SubmissionPlan, SubmissionReport, NO_SCHEDULE_LABEL,
};
pub use tasks::{FinishedTask, TaskWrapper};
pub use widgets::StatusBarState;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::api::{
    AuthInfo, ClusterStatus, DashboardApi, Host, HostInventory, NewHost, ServiceSummary,
};
use crate::ui::Theme;
use crate::vim::{parse_command, Command, InputBuffer, ModeAction, VimMode};

/// Everything background work reports back to the event loop
#[derive(Debug)]
pub enum ExpandMessage {
    Notify(Notification),
    Navigate(Route),
    LoggedIn(Result<AuthInfo, String>),
    ClusterStatusLoaded(Result<ClusterStatus, String>),
    HostsLoaded(Result<Vec<Host>, String>),
    InventoryLoaded(Result<Vec<HostInventory>, String>),
    ServicesLoaded(Result<Vec<ServiceSummary>, String>),
    HostAdded(Result<String, String>),
    HostUpdated { hostname: String, ok: bool },
    TaskStarted(String),
    TaskFinished(FinishedTask),
    /// OSD creation request was accepted by the dashboard
    OsdsCreated,
    SubmissionComplete(SubmissionReport),
    /// Skip confirmation finished, close the dialog
    SkipComplete,
}

/// Work the event loop starts on behalf of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandAction {
    Login,
    CheckStatus,
    LoadStep(StepId),
    AddHost,
    Submit,
    ConfirmSkip,
}

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Login,
    /// Expand or skip choice, before the wizard starts
    Welcome,
    Wizard,
    /// Navigated away from the wizard
    Finished,
}

/// What is currently focused in the content panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFocus {
    /// The step's list (hosts, devices, services)
    List,
    InputField(usize),
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub kind: NotificationType,
}

impl Message {
    pub fn is_error(&self) -> bool {
        self.kind == NotificationType::Error
    }
}

/// Status of a tracked backend operation
#[derive(Debug, Clone)]
pub struct TaskStatus {
    pub name: String,
    pub status: TaskState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Success,
    Failed,
}

/// Main wizard application state
pub struct ExpandApp {
    pub config: ExpandConfig,
    pub theme: Theme,
    api: Arc<dyn DashboardApi>,
    outbox: Outbox,

    // Vim mode state
    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,

    // Navigation
    pub panel_focus: PanelFocus,
    pub content_focus: ContentFocus,
    pub controller: WizardController,
    pub step_results: Vec<StepResult>,
    pub list_selected: usize,

    // Login form
    pub username: InputBuffer,
    pub password: InputBuffer,
    pub auth: Option<AuthInfo>,
    pub cluster_status: Option<ClusterStatus>,

    // Add Hosts step
    pub hosts: Vec<Host>,
    pub new_hostname: InputBuffer,
    pub new_addr: InputBuffer,
    pub new_labels: InputBuffer,

    // Create OSDs step
    pub inventory: Vec<HostInventory>,
    pub device_type: DeviceType,
    pub vendor: InputBuffer,
    pub model: InputBuffer,
    pub host_pattern: InputBuffer,
    pub encrypted: bool,

    // Create Services step
    pub services: Vec<ServiceSummary>,

    // Submission state
    pub tasks: Vec<TaskStatus>,
    pub is_executing: bool,
    pub is_loading: bool,
    pub report: Option<SubmissionReport>,
    pub route: Option<Route>,

    // UI state
    pub message: Option<Message>,
    pub confirm_skip: Option<SkipDialog>,
    pub show_help: bool,
    pub should_exit: bool,
    pub status_bar: StatusBarState,
    spinner_frame: usize,
}

impl ExpandApp {
    pub fn new(config: ExpandConfig, api: Arc<dyn DashboardApi>, outbox: Outbox) -> Self {
        let steps = WizardSteps::expansion();
        let step_results = vec![StepResult::Pending; steps.total_steps()];
        let controller = WizardController::new(steps, outbox.clone());

        let mut app = Self {
            theme: Theme::default(),
            api,
            outbox,
            vim_mode: VimMode::Normal,
            command_buffer: InputBuffer::new(),
            panel_focus: PanelFocus::Login,
            content_focus: ContentFocus::InputField(0),
            controller,
            step_results,
            list_selected: 0,
            username: InputBuffer::with_value(&config.dashboard.username),
            password: InputBuffer::masked(),
            auth: None,
            cluster_status: None,
            hosts: Vec::new(),
            new_hostname: InputBuffer::new(),
            new_addr: InputBuffer::new(),
            new_labels: InputBuffer::new(),
            inventory: Vec::new(),
            device_type: config.osd.device_type,
            vendor: InputBuffer::new(),
            model: InputBuffer::new(),
            host_pattern: InputBuffer::with_value(&config.osd.host_pattern),
            encrypted: config.osd.encrypted,
            services: Vec::new(),
            tasks: Vec::new(),
            is_executing: false,
            is_loading: false,
            report: None,
            route: None,
            message: None,
            confirm_skip: None,
            show_help: false,
            should_exit: false,
            status_bar: StatusBarState::login_normal(),
            spinner_frame: 0,
            config,
        };
        if !app.username.is_empty() {
            app.content_focus = ContentFocus::InputField(1);
        }
        app
    }

    pub fn is_dryrun(&self) -> bool {
        self.config.general.dryrun
    }

    pub fn current_step_id(&self) -> Option<StepId> {
        self.controller.current_step_id()
    }

    /// Fill the password field, e.g. from the environment
    pub fn set_password(&mut self, password: &str) {
        self.password.set(password);
    }

    pub fn device_selection(&self) -> DeviceSelection {
        DeviceSelection {
            device_type: self.device_type,
            vendor: self.vendor.content().to_string(),
            model: self.model.content().to_string(),
        }
    }

    pub fn selected_device_count(&self) -> usize {
        self.device_selection().total_devices(&self.inventory)
    }

    /// Drive group as it would be submitted right now
    pub fn drive_group(&self) -> DriveGroup {
        let pattern = match self.host_pattern.trimmed() {
            "" => "*",
            pattern => pattern,
        };
        self.device_selection()
            .drive_group(pattern, self.encrypted, Utc::now())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ExpandAction> {
        if self.message.is_some() && !self.is_executing {
            self.message = None;
        }

        let result = self.dispatch_key(key);
        self.update_status_bar();
        result
    }

    fn dispatch_key(&mut self, key: KeyEvent) -> Option<ExpandAction> {
        if self.is_executing {
            return None;
        }

        if self.panel_focus == PanelFocus::Finished {
            self.should_exit = true;
            return None;
        }

        if self.confirm_skip.is_some() {
            return self.handle_confirm_key(key);
        }

        if self.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('q') {
                self.show_help = false;
            }
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return None;
        }

        match self.vim_mode {
            VimMode::Normal => self.handle_normal_mode(key),
            VimMode::Insert => self.handle_insert_mode(key),
            VimMode::Command => self.handle_command_mode(key),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<ExpandAction> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                // Dialog stays up until the skip flow reports back
                self.is_executing = true;
                Some(ExpandAction::ConfirmSkip)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_skip = None;
                None
            }
            _ => None,
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<ExpandAction> {
        match key.code {
            KeyCode::Char(':') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
                self.command_buffer.clear();
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.navigate_down(),
            KeyCode::Char('k') | KeyCode::Up => self.navigate_up(),
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Char('i') => {
                if matches!(self.content_focus, ContentFocus::InputField(_)) {
                    self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
                }
            }
            KeyCode::Enter => return self.handle_enter(),
            _ => return self.handle_panel_key(key.code),
        }
        None
    }

    fn handle_enter(&mut self) -> Option<ExpandAction> {
        match self.panel_focus {
            PanelFocus::Login => self.submit_login(),
            PanelFocus::Welcome => self.start_wizard(),
            PanelFocus::Wizard => match self.content_focus {
                ContentFocus::InputField(_) => {
                    self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
                    None
                }
                ContentFocus::List => self.next_step(),
            },
            PanelFocus::Finished => None,
        }
    }

    fn handle_panel_key(&mut self, code: KeyCode) -> Option<ExpandAction> {
        match self.panel_focus {
            PanelFocus::Welcome => match code {
                KeyCode::Char('s') => self.open_skip_dialog(),
                KeyCode::Char('q') => self.should_exit = true,
                _ => {}
            },
            PanelFocus::Wizard => match code {
                KeyCode::Char('n') => return self.next_step(),
                KeyCode::Char('p') => return self.previous_step(),
                KeyCode::Esc => {
                    if matches!(self.content_focus, ContentFocus::InputField(_)) {
                        self.content_focus = ContentFocus::List;
                    }
                }
                KeyCode::Char('r') => return self.current_step_id().map(ExpandAction::LoadStep),
                KeyCode::Char('a') if self.current_step_id() == Some(StepId::Hosts) => {
                    return self.submit_new_host();
                }
                KeyCode::Char('e') if self.current_step_id() == Some(StepId::Osds) => {
                    self.toggle_encrypted();
                }
                KeyCode::Char('t') if self.current_step_id() == Some(StepId::Osds) => {
                    self.device_type = self.device_type.next();
                }
                _ => {}
            },
            PanelFocus::Login | PanelFocus::Finished => {}
        }
        None
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) -> Option<ExpandAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
            }
            KeyCode::Enter => {
                let ContentFocus::InputField(field) = self.content_focus else {
                    self.vim_mode = VimMode::Normal;
                    return None;
                };
                if field + 1 < self.field_count() {
                    self.content_focus = ContentFocus::InputField(field + 1);
                    return None;
                }
                self.vim_mode = VimMode::Normal;
                return match (self.panel_focus, self.current_step_id()) {
                    (PanelFocus::Login, _) => self.submit_login(),
                    (PanelFocus::Wizard, Some(StepId::Hosts)) => self.submit_new_host(),
                    _ => None,
                };
            }
            KeyCode::Tab => self.move_field(true),
            KeyCode::BackTab => self.move_field(false),
            KeyCode::Backspace => {
                if let Some(buffer) = self.current_input_buffer() {
                    buffer.delete_back();
                }
            }
            KeyCode::Delete => {
                if let Some(buffer) = self.current_input_buffer() {
                    buffer.delete_forward();
                }
            }
            KeyCode::Left => {
                if let Some(buffer) = self.current_input_buffer() {
                    buffer.move_left();
                }
            }
            KeyCode::Right => {
                if let Some(buffer) = self.current_input_buffer() {
                    buffer.move_right();
                }
            }
            KeyCode::Home => {
                if let Some(buffer) = self.current_input_buffer() {
                    buffer.move_start();
                }
            }
            KeyCode::End => {
                if let Some(buffer) = self.current_input_buffer() {
                    buffer.move_end();
                }
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    if let Some(buffer) = self.current_input_buffer() {
                        match c {
                            'u' => buffer.clear(),
                            'a' => buffer.move_start(),
                            'e' => buffer.move_end(),
                            _ => {}
                        }
                    }
                } else if let Some(buffer) = self.current_input_buffer() {
                    buffer.insert(c);
                }
            }
            _ => {}
        }
        None
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<ExpandAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content().to_string();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                return self.execute_command(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.insert(c);
            }
            _ => {}
        }
        None
    }

    fn execute_command(&mut self, cmd: &str) -> Option<ExpandAction> {
        let command = match parse_command(cmd) {
            Ok(command) => command,
            Err(e) => {
                self.set_error(e.to_string());
                return None;
            }
        };
        let in_wizard = self.panel_focus == PanelFocus::Wizard;

        match command {
            Command::Next if in_wizard => return self.next_step(),
            Command::Back if in_wizard => return self.previous_step(),
            Command::Next | Command::Back => {
                self.set_error("The wizard has not been started".to_string());
            }
            Command::Skip => {
                if matches!(self.panel_focus, PanelFocus::Welcome | PanelFocus::Wizard) {
                    self.open_skip_dialog();
                } else {
                    self.set_error("Log in first".to_string());
                }
            }
            Command::Expand => match self.panel_focus {
                PanelFocus::Welcome => return self.start_wizard(),
                PanelFocus::Wizard if self.controller.is_last_step() => {
                    return Some(ExpandAction::Submit);
                }
                _ => self.set_error("Go to the Review step to expand the cluster".to_string()),
            },
            Command::Refresh if in_wizard => {
                return self.current_step_id().map(ExpandAction::LoadStep);
            }
            Command::Refresh => {}
            Command::Encrypt => self.toggle_encrypted(),
            Command::Help => self.show_help = true,
            Command::Quit => self.should_exit = true,
        }
        None
    }

    fn submit_login(&mut self) -> Option<ExpandAction> {
        if self.username.trimmed().is_empty() {
            self.set_error("Username is required".to_string());
            self.content_focus = ContentFocus::InputField(0);
            return None;
        }
        if self.password.is_empty() {
            self.set_error("Password is required".to_string());
            self.content_focus = ContentFocus::InputField(1);
            return None;
        }
        Some(ExpandAction::Login)
    }

    fn submit_new_host(&mut self) -> Option<ExpandAction> {
        if self.new_hostname.trimmed().is_empty() {
            self.set_error("Hostname is required".to_string());
            self.content_focus = ContentFocus::InputField(0);
            return None;
        }
        Some(ExpandAction::AddHost)
    }

    fn start_wizard(&mut self) -> Option<ExpandAction> {
        self.panel_focus = PanelFocus::Wizard;
        self.enter_step();
        self.current_step_id().map(ExpandAction::LoadStep)
    }

    fn open_skip_dialog(&mut self) {
        self.confirm_skip = Some(SKIP_DIALOG);
    }

    fn next_step(&mut self) -> Option<ExpandAction> {
        match self.controller.advance_step() {
            Advance::Moved(step) => {
                if let Some(result) = step.index.checked_sub(2).and_then(|i| self.step_results.get_mut(i)) {
                    *result = StepResult::Completed;
                }
                self.enter_step();
                StepId::from_index(step.index).map(ExpandAction::LoadStep)
            }
            Advance::Submit => Some(ExpandAction::Submit),
        }
    }

    fn previous_step(&mut self) -> Option<ExpandAction> {
        match self.controller.retreat_step() {
            Retreat::Moved(step) => {
                self.enter_step();
                StepId::from_index(step.index).map(ExpandAction::LoadStep)
            }
            // Navigation message arrives through the outbox
            Retreat::Left(_) => None,
        }
    }

    fn enter_step(&mut self) {
        self.content_focus = ContentFocus::List;
        self.vim_mode = VimMode::Normal;
        self.list_selected = 0;
    }

    fn toggle_encrypted(&mut self) {
        self.encrypted = !self.encrypted;
        let state = if self.encrypted { "enabled" } else { "disabled" };
        self.set_info(format!("Encryption {state}"));
    }

    fn field_count(&self) -> usize {
        match (self.panel_focus, self.current_step_id()) {
            (PanelFocus::Login, _) => 2,
            (PanelFocus::Wizard, Some(StepId::Hosts | StepId::Osds)) => 3,
            _ => 0,
        }
    }

    fn list_len(&self) -> usize {
        match self.current_step_id() {
            Some(StepId::Hosts) => self.hosts.len(),
            Some(StepId::Osds) => self.inventory.iter().map(|h| h.devices.len()).sum(),
            Some(StepId::Services) => self.services.len(),
            _ => 0,
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let fields = self.field_count();
        if fields == 0 {
            return;
        }
        let has_list = self.panel_focus == PanelFocus::Wizard;
        self.content_focus = match (self.content_focus, forward) {
            (ContentFocus::List, true) => ContentFocus::InputField(0),
            (ContentFocus::List, false) => ContentFocus::InputField(fields - 1),
            (ContentFocus::InputField(i), true) if i + 1 < fields => ContentFocus::InputField(i + 1),
            (ContentFocus::InputField(i), false) if i > 0 => ContentFocus::InputField(i - 1),
            (ContentFocus::InputField(_), true) if !has_list => ContentFocus::InputField(0),
            (ContentFocus::InputField(_), false) if !has_list => ContentFocus::InputField(fields - 1),
            (ContentFocus::InputField(_), _) => ContentFocus::List,
        };
    }

    fn move_field(&mut self, forward: bool) {
        if let ContentFocus::InputField(field) = self.content_focus {
            let fields = self.field_count();
            if forward && field + 1 < fields {
                self.content_focus = ContentFocus::InputField(field + 1);
            } else if !forward && field > 0 {
                self.content_focus = ContentFocus::InputField(field - 1);
            }
        }
    }

    fn navigate_down(&mut self) {
        match self.content_focus {
            ContentFocus::List => {
                if self.list_selected + 1 < self.list_len() {
                    self.list_selected += 1;
                }
            }
            ContentFocus::InputField(_) => self.move_field(true),
        }
    }

    fn navigate_up(&mut self) {
        match self.content_focus {
            ContentFocus::List => {
                self.list_selected = self.list_selected.saturating_sub(1);
            }
            ContentFocus::InputField(_) => self.move_field(false),
        }
    }

    fn current_input_buffer(&mut self) -> Option<&mut InputBuffer> {
        let ContentFocus::InputField(idx) = self.content_focus else {
            return None;
        };
        match (self.panel_focus, self.controller.current_step_id()) {
            (PanelFocus::Login, _) => match idx {
                0 => Some(&mut self.username),
                1 => Some(&mut self.password),
                _ => None,
            },
            (PanelFocus::Wizard, Some(StepId::Hosts)) => match idx {
                0 => Some(&mut self.new_hostname),
                1 => Some(&mut self.new_addr),
                2 => Some(&mut self.new_labels),
                _ => None,
            },
            (PanelFocus::Wizard, Some(StepId::Osds)) => match idx {
                0 => Some(&mut self.vendor),
                1 => Some(&mut self.model),
                2 => Some(&mut self.host_pattern),
                _ => None,
            },
            _ => None,
        }
    }

    /// Start the background work for an action. Results come back as
    /// [`ExpandMessage`]s through the outbox.
    pub fn perform(&mut self, action: ExpandAction) {
        debug!("Performing {:?}", action);
        match action {
            ExpandAction::Login => self.start_login(),
            ExpandAction::CheckStatus => {
                let api = Arc::clone(&self.api);
                let outbox = self.outbox.clone();
                tokio::spawn(async move {
                    let result = api.cluster_status().await.map_err(|e| e.to_string());
                    outbox.emit(ExpandMessage::ClusterStatusLoaded(result));
                });
            }
            ExpandAction::LoadStep(step) => self.load_step(step),
            ExpandAction::AddHost => self.start_add_host(),
            ExpandAction::Submit => self.start_submission(),
            ExpandAction::ConfirmSkip => {
                self.is_executing = true;
                let flow = SkipFlow::new(Arc::clone(&self.api), self.outbox.clone());
                tokio::spawn(async move {
                    let _ = flow.confirm().await;
                });
            }
        }
    }

    fn start_login(&mut self) {
        self.is_executing = true;
        let api = Arc::clone(&self.api);
        let outbox = self.outbox.clone();
        let username = self.username.trimmed().to_string();
        let password = Zeroizing::new(self.password.content().to_string());

        tokio::spawn(async move {
            let result = api
                .login(&username, &password)
                .await
                .map_err(|e| e.to_string());
            outbox.emit(ExpandMessage::LoggedIn(result));
        });
    }

    fn load_step(&mut self, step: StepId) {
        self.is_loading = true;
        match step {
            StepId::Hosts => self.spawn_host_load(),
            StepId::Osds => self.spawn_inventory_load(),
            StepId::Services => self.spawn_service_load(),
            StepId::Review => {
                self.spawn_host_load();
                self.spawn_inventory_load();
                self.spawn_service_load();
            }
        }
    }

    fn spawn_host_load(&self) {
        let api = Arc::clone(&self.api);
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let result = api.list_hosts().await.map_err(|e| e.to_string());
            outbox.emit(ExpandMessage::HostsLoaded(result));
        });
    }

    fn spawn_inventory_load(&self) {
        let api = Arc::clone(&self.api);
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let result = load_inventory(api.as_ref()).await;
            outbox.emit(ExpandMessage::InventoryLoaded(result));
        });
    }

    fn spawn_service_load(&self) {
        let api = Arc::clone(&self.api);
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let result = api.list_services().await.map_err(|e| e.to_string());
            outbox.emit(ExpandMessage::ServicesLoaded(result));
        });
    }

    fn start_add_host(&mut self) {
        let host = NewHost {
            hostname: self.new_hostname.trimmed().to_string(),
            addr: Some(self.new_addr.trimmed().to_string()).filter(|a| !a.is_empty()),
            labels: self.new_labels.list_values(),
            status: String::new(),
        };
        info!("Adding host {}", host.hostname);
        self.is_loading = true;

        let api = Arc::clone(&self.api);
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let result = api
                .add_host(&host)
                .await
                .map(|()| host.hostname.clone())
                .map_err(|e| e.to_string());
            outbox.emit(ExpandMessage::HostAdded(result));
        });
    }

    fn start_submission(&mut self) {
        let Some(username) = self.auth.as_ref().map(|a| a.username.clone()) else {
            self.set_error("Not logged in".to_string());
            return;
        };

        let plan = SubmissionPlan {
            username,
            drive_group: self.drive_group(),
            selected_devices: self.selected_device_count(),
        };
        self.is_executing = true;
        self.tasks.clear();
        self.report = None;

        let orchestrator = SubmissionOrchestrator::new(Arc::clone(&self.api), self.outbox.clone());
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let report = orchestrator.submit(plan).await;
            outbox.emit(ExpandMessage::SubmissionComplete(report));
        });
    }

    /// Apply a message from background work
    pub fn handle_message(&mut self, msg: ExpandMessage) {
        match msg {
            ExpandMessage::Notify(notification) => {
                self.message = Some(Message {
                    text: notification.title,
                    kind: notification.kind,
                });
            }
            ExpandMessage::Navigate(route) => {
                info!("Leaving wizard for {}", route.path());
                self.route = Some(route);
                self.panel_focus = PanelFocus::Finished;
                self.vim_mode = VimMode::Normal;
                self.show_help = false;
            }
            ExpandMessage::LoggedIn(result) => {
                self.is_executing = false;
                match result {
                    Ok(auth) => {
                        info!("Logged in as {}", auth.username);
                        self.auth = Some(auth);
                        self.password.clear();
                        self.panel_focus = PanelFocus::Welcome;
                        self.vim_mode = VimMode::Normal;
                        self.perform(ExpandAction::CheckStatus);
                    }
                    Err(e) => {
                        self.password.clear();
                        self.content_focus = ContentFocus::InputField(1);
                        self.set_error(e);
                    }
                }
            }
            ExpandMessage::ClusterStatusLoaded(result) => match result {
                Ok(status) => {
                    if status == ClusterStatus::PostInstalled {
                        self.set_info("This cluster has already been expanded".to_string());
                    }
                    self.cluster_status = Some(status);
                }
                Err(e) => warn!("Failed to read cluster status: {}", e),
            },
            ExpandMessage::HostsLoaded(result) => {
                self.is_loading = false;
                match result {
                    Ok(hosts) => self.hosts = hosts,
                    Err(e) => self.set_error(format!("Failed to load hosts: {e}")),
                }
                self.clamp_selection();
            }
            ExpandMessage::InventoryLoaded(result) => {
                self.is_loading = false;
                match result {
                    Ok(inventory) => self.inventory = inventory,
                    Err(e) => self.set_error(format!("Failed to load inventory: {e}")),
                }
                self.clamp_selection();
            }
            ExpandMessage::ServicesLoaded(result) => {
                self.is_loading = false;
                match result {
                    Ok(services) => self.services = services,
                    Err(e) => self.set_error(format!("Failed to load services: {e}")),
                }
                self.clamp_selection();
            }
            ExpandMessage::HostAdded(result) => {
                self.is_loading = false;
                match result {
                    Ok(hostname) => {
                        self.set_success(format!("Host {hostname} added"));
                        self.new_hostname.clear();
                        self.new_addr.clear();
                        self.new_labels.clear();
                        self.content_focus = ContentFocus::List;
                        self.perform(ExpandAction::LoadStep(StepId::Hosts));
                    }
                    Err(e) => self.set_error(format!("Failed to add host: {e}")),
                }
            }
            ExpandMessage::HostUpdated { hostname, ok } => {
                self.tasks.push(TaskStatus {
                    name: format!("Accept host {hostname}"),
                    status: if ok { TaskState::Success } else { TaskState::Failed },
                });
            }
            ExpandMessage::TaskStarted(name) => {
                self.tasks.push(TaskStatus {
                    name,
                    status: TaskState::Running,
                });
            }
            ExpandMessage::TaskFinished(task) => {
                let status = if task.success { TaskState::Success } else { TaskState::Failed };
                let name = task.finished_message();
                match self.tasks.iter_mut().rev().find(|t| t.status == TaskState::Running) {
                    Some(entry) => {
                        entry.status = status;
                        entry.name = name;
                    }
                    None => self.tasks.push(TaskStatus { name, status }),
                }
            }
            ExpandMessage::OsdsCreated => {
                self.inventory.clear();
                self.vendor.clear();
                self.model.clear();
            }
            ExpandMessage::SubmissionComplete(report) => {
                self.is_executing = false;
                self.record_report(report);
            }
            ExpandMessage::SkipComplete => {
                self.is_executing = false;
                self.confirm_skip = None;
            }
        }
        self.update_status_bar();
    }

    fn record_report(&mut self, report: SubmissionReport) {
        if let HostPhase::ListFailed(e) = &report.hosts {
            self.tasks.push(TaskStatus {
                name: format!("List hosts: {e}"),
                status: TaskState::Failed,
            });
        }
        self.tasks.push(TaskStatus {
            name: "Mark cluster as expanded".to_string(),
            status: if report.status.is_ok() { TaskState::Success } else { TaskState::Failed },
        });

        let success = report.is_success();
        if let Some(result) = self.step_results.last_mut() {
            *result = if success { StepResult::Completed } else { StepResult::Failed };
        }
        if success {
            info!("Cluster expansion submitted");
        } else {
            warn!("Cluster expansion finished with errors: {:?}", report);
            if !self.message.as_ref().is_some_and(Message::is_error) {
                self.set_error(failure_summary(&report));
            }
        }
        // No Navigate arrives when the status update failed
        if report.status.is_err() {
            self.panel_focus = PanelFocus::Finished;
            self.vim_mode = VimMode::Normal;
            self.show_help = false;
        }
        self.report = Some(report);
    }

    fn clamp_selection(&mut self) {
        self.list_selected = self.list_selected.min(self.list_len().saturating_sub(1));
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            kind: NotificationType::Error,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            kind: NotificationType::Info,
        });
    }

    pub fn set_success(&mut self, text: String) {
        self.message = Some(Message {
            text,
            kind: NotificationType::Success,
        });
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 4;
        self.update_status_bar();
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_frame]
    }

    /// Update status bar based on current application state
    pub fn update_status_bar(&mut self) {
        if self.is_executing {
            self.status_bar = StatusBarState::executing();
            return;
        }
        if self.confirm_skip.is_some() {
            self.status_bar = StatusBarState::confirm();
            return;
        }
        if self.vim_mode == VimMode::Command {
            self.status_bar = StatusBarState::command_mode();
            return;
        }
        if self.vim_mode == VimMode::Insert {
            self.status_bar = StatusBarState::form_insert();
            return;
        }

        self.status_bar = match self.panel_focus {
            PanelFocus::Login => StatusBarState::login_normal(),
            PanelFocus::Welcome => StatusBarState::welcome(),
            PanelFocus::Finished => StatusBarState::finished(),
            PanelFocus::Wizard => {
                let hint = match self.current_step_id() {
                    Some(StepId::Hosts) => "Tab: add form  a: add host  r: refresh",
                    Some(StepId::Osds) => "t: type  e: encrypt  Tab: filters",
                    Some(StepId::Services) => "j/k: services  r: refresh",
                    Some(StepId::Review) | None => "Review the expansion",
                };
                StatusBarState::wizard(
                    hint,
                    self.controller.submit_button_label(),
                    self.controller.cancel_button_label(),
                )
            }
        };
    }
}

async fn load_inventory(api: &dyn DashboardApi) -> Result<Vec<HostInventory>, String> {
    let hosts = api.list_hosts().await.map_err(|e| e.to_string())?;
    try_join_all(hosts.iter().map(|host| api.host_inventory(&host.hostname)))
        .await
        .map_err(|e| e.to_string())
}

fn failure_summary(report: &SubmissionReport) -> String {
    let mut problems = Vec::new();
    match &report.hosts {
        HostPhase::ListFailed(_) => problems.push("hosts could not be listed".to_string()),
        HostPhase::Updated(_) => {
            let failed = report.failed_host_updates().len();
            if failed > 0 {
                problems.push(format!("{failed} host update(s) failed"));
            }
        }
    }
    if report.status.is_err() {
        problems.push("cluster status was not updated".to_string());
    }
    if let OsdOutcome::Failed { error, .. } = &report.osds {
        problems.push(format!("OSD creation failed ({error})"));
    }
    format!("Cluster expansion finished with errors: {}", problems.join("; "))
}

//! In-memory GitLab used by command tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    AppError, CiVariable, DeployKey, Job, Namespace, NewDeployKey, NewPipelineSchedule, NewProject,
    Pipeline, PipelineSchedule, PipelineTriggerRequest, Project, ProjectPath, Trigger, User,
    Webhook,
};
use crate::ports::GitLabApi;

pub const FAKE_WEB_BASE: &str = "https://gitlab.test";

#[derive(Debug)]
struct FakeProject {
    project: Project,
    variables: Vec<CiVariable>,
    triggers: Vec<Trigger>,
    hooks: Vec<Webhook>,
    deploy_keys: Vec<DeployKey>,
    schedules: Vec<PipelineSchedule>,
    schedule_variables: BTreeMap<u64, Vec<(String, String)>>,
    pipelines: Vec<Pipeline>,
    fired: Vec<PipelineTriggerRequest>,
    jobs: Vec<(Job, String)>,
}

impl FakeProject {
    fn new(project: Project) -> Self {
        Self {
            project,
            variables: Vec::new(),
            triggers: Vec::new(),
            hooks: Vec::new(),
            deploy_keys: Vec::new(),
            schedules: Vec::new(),
            schedule_variables: BTreeMap::new(),
            pipelines: Vec::new(),
            fired: Vec::new(),
            jobs: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: u64,
    token_rejected: bool,
    projects: BTreeMap<String, FakeProject>,
    namespaces: Vec<Namespace>,
}

impl FakeState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn by_id(&mut self, project_id: u64) -> Result<&mut FakeProject, AppError> {
        self.projects
            .values_mut()
            .find(|p| p.project.id == project_id)
            .ok_or_else(|| AppError::not_found(format!("project {}", project_id)))
    }
}

/// GitLab fake recording every call as `METHOD resource`.
#[derive(Debug, Default)]
pub struct FakeGitLab {
    state: RefCell<FakeState>,
    calls: RefCell<Vec<String>>,
}

impl FakeGitLab {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.borrow_mut().next_id = 100;
        fake
    }

    /// Register a project (and its namespace) and return its id.
    pub fn add_project(&self, path: &str) -> u64 {
        let parsed = ProjectPath::new(path).expect("valid project path");
        self.add_namespace(parsed.namespace());
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let project = Project {
            id,
            name: parsed.name().to_string(),
            path_with_namespace: path.to_string(),
            web_url: format!("{}/{}", FAKE_WEB_BASE, path),
        };
        state.projects.insert(path.to_string(), FakeProject::new(project));
        id
    }

    pub fn add_namespace(&self, full_path: &str) -> u64 {
        let mut state = self.state.borrow_mut();
        if let Some(existing) = state.namespaces.iter().find(|n| n.full_path == full_path) {
            return existing.id;
        }
        let id = state.next_id();
        let name = full_path.rsplit('/').next().unwrap_or(full_path).to_string();
        state.namespaces.push(Namespace { id, name, full_path: full_path.to_string() });
        id
    }

    pub fn add_trigger(&self, path: &str, description: &str) -> Trigger {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let trigger =
            Trigger { id, description: description.to_string(), token: format!("token-{}", id) };
        state.projects.get_mut(path).expect("known project").triggers.push(trigger.clone());
        trigger
    }

    pub fn add_variable(&self, path: &str, key: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        state
            .projects
            .get_mut(path)
            .expect("known project")
            .variables
            .push(CiVariable { key: key.to_string(), value: value.to_string() });
    }

    pub fn add_hook(&self, path: &str, url: &str, push_events: bool) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.projects.get_mut(path).expect("known project").hooks.push(Webhook {
            id,
            url: url.to_string(),
            push_events,
        });
        id
    }

    pub fn add_schedule(&self, path: &str, description: &str, active: bool) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.projects.get_mut(path).expect("known project").schedules.push(PipelineSchedule {
            id,
            description: description.to_string(),
            git_ref: "master".to_string(),
            cron: "0 1 * * *".to_string(),
            active,
            next_run_at: None,
        });
        id
    }

    pub fn set_schedule_next_run(&self, path: &str, schedule_id: u64, at: DateTime<Utc>) {
        let mut state = self.state.borrow_mut();
        let project = state.projects.get_mut(path).expect("known project");
        if let Some(schedule) = project.schedules.iter_mut().find(|s| s.id == schedule_id) {
            schedule.next_run_at = Some(at);
        }
    }

    /// Record a finished job with its log; later jobs are listed first.
    pub fn add_job(&self, path: &str, name: &str, status: &str, trace: &str) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let project = state.projects.get_mut(path).expect("known project");
        let job = Job {
            id,
            name: name.to_string(),
            stage: name.to_string(),
            status: status.to_string(),
            web_url: format!("{}/-/jobs/{}", project.project.web_url, id),
            duration: Some(42.0),
            created_at: None,
            started_at: None,
            finished_at: None,
        };
        project.jobs.push((job, trace.to_string()));
        id
    }

    pub fn add_pipeline(&self, path: &str, status: &str) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let project = state.projects.get_mut(path).expect("known project");
        let web_url = format!("{}/-/pipelines/{}", project.project.web_url, id);
        project.pipelines.push(Pipeline {
            id,
            status: status.to_string(),
            git_ref: "master".to_string(),
            web_url: Some(web_url),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).single(),
        });
        id
    }

    /// Answer every later call with an authorization failure.
    pub fn reject_token(&self) {
        self.state.borrow_mut().token_rejected = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Calls that mutate remote state.
    pub fn writes(&self) -> Vec<String> {
        self.calls.borrow().iter().filter(|c| !c.starts_with("GET ")).cloned().collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn variables(&self, path: &str) -> BTreeMap<String, String> {
        self.with_project(path, |p| {
            p.variables.iter().map(|v| (v.key.clone(), v.value.clone())).collect()
        })
    }

    pub fn triggers(&self, path: &str) -> Vec<Trigger> {
        self.with_project(path, |p| p.triggers.clone())
    }

    pub fn hooks(&self, path: &str) -> Vec<Webhook> {
        self.with_project(path, |p| p.hooks.clone())
    }

    pub fn deploy_keys(&self, path: &str) -> Vec<DeployKey> {
        self.with_project(path, |p| p.deploy_keys.clone())
    }

    pub fn schedules(&self, path: &str) -> Vec<PipelineSchedule> {
        self.with_project(path, |p| p.schedules.clone())
    }

    pub fn schedule_variables(&self, path: &str, schedule_id: u64) -> Vec<(String, String)> {
        self.with_project(path, |p| {
            p.schedule_variables.get(&schedule_id).cloned().unwrap_or_default()
        })
    }

    pub fn pipelines(&self, path: &str) -> Vec<Pipeline> {
        self.with_project(path, |p| p.pipelines.clone())
    }

    pub fn fired(&self, path: &str) -> Vec<PipelineTriggerRequest> {
        self.with_project(path, |p| p.fired.clone())
    }

    pub fn has_project(&self, path: &str) -> bool {
        self.state.borrow().projects.contains_key(path)
    }

    fn with_project<T>(&self, path: &str, f: impl FnOnce(&FakeProject) -> T) -> T {
        let state = self.state.borrow();
        f(state.projects.get(path).expect("known project"))
    }

    fn record(&self, call: String) -> Result<(), AppError> {
        self.calls.borrow_mut().push(call);
        if self.state.borrow().token_rejected {
            return Err(AppError::Authorization("token rejected (401)".into()));
        }
        Ok(())
    }
}

impl GitLabApi for FakeGitLab {
    fn current_user(&self) -> Result<User, AppError> {
        self.record("GET user".into())?;
        Ok(User { id: 1, username: "operator".into() })
    }

    fn project(&self, path: &ProjectPath) -> Result<Project, AppError> {
        self.record(format!("GET project {}", path))?;
        self.state
            .borrow()
            .projects
            .get(path.as_str())
            .map(|p| p.project.clone())
            .ok_or_else(|| AppError::not_found(format!("project '{}'", path)))
    }

    fn create_project(&self, request: &NewProject) -> Result<Project, AppError> {
        self.record(format!("POST project {}", request.name))?;
        let namespace = self
            .state
            .borrow()
            .namespaces
            .iter()
            .find(|n| n.id == request.namespace_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("namespace {}", request.namespace_id)))?;
        let path = format!("{}/{}", namespace.full_path, request.name);
        self.add_project(&path);
        Ok(self.with_project(&path, |p| p.project.clone()))
    }

    fn list_group_projects(&self, group: &str) -> Result<Vec<Project>, AppError> {
        self.record(format!("GET group {} projects", group))?;
        let state = self.state.borrow();
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| {
                p.project.path_with_namespace.rsplit_once('/').map(|(ns, _)| ns) == Some(group)
            })
            .map(|p| p.project.clone())
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    fn find_namespace(&self, full_path: &str) -> Result<Option<Namespace>, AppError> {
        self.record(format!("GET namespace {}", full_path))?;
        Ok(self.state.borrow().namespaces.iter().find(|n| n.full_path == full_path).cloned())
    }

    fn list_variables(&self, project_id: u64) -> Result<Vec<CiVariable>, AppError> {
        self.record(format!("GET {} variables", project_id))?;
        Ok(self.state.borrow_mut().by_id(project_id)?.variables.clone())
    }

    fn create_variable(&self, project_id: u64, key: &str, value: &str) -> Result<(), AppError> {
        self.record(format!("POST {} variable {}", project_id, key))?;
        let mut state = self.state.borrow_mut();
        let project = state.by_id(project_id)?;
        if project.variables.iter().any(|v| v.key == key) {
            return Err(AppError::Api {
                status: 400,
                endpoint: format!("/projects/{}/variables", project_id),
                message: format!("{} has already been taken", key),
            });
        }
        project.variables.push(CiVariable { key: key.to_string(), value: value.to_string() });
        Ok(())
    }

    fn update_variable(&self, project_id: u64, key: &str, value: &str) -> Result<(), AppError> {
        self.record(format!("PUT {} variable {}", project_id, key))?;
        let mut state = self.state.borrow_mut();
        let variable = state
            .by_id(project_id)?
            .variables
            .iter_mut()
            .find(|v| v.key == key)
            .ok_or_else(|| AppError::not_found(format!("variable {}", key)))?;
        variable.value = value.to_string();
        Ok(())
    }

    fn delete_variable(&self, project_id: u64, key: &str) -> Result<(), AppError> {
        self.record(format!("DELETE {} variable {}", project_id, key))?;
        self.state.borrow_mut().by_id(project_id)?.variables.retain(|v| v.key != key);
        Ok(())
    }

    fn list_triggers(&self, project_id: u64) -> Result<Vec<Trigger>, AppError> {
        self.record(format!("GET {} triggers", project_id))?;
        Ok(self.state.borrow_mut().by_id(project_id)?.triggers.clone())
    }

    fn create_trigger(&self, project_id: u64, description: &str) -> Result<Trigger, AppError> {
        self.record(format!("POST {} trigger {}", project_id, description))?;
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let trigger =
            Trigger { id, description: description.to_string(), token: format!("token-{}", id) };
        state.by_id(project_id)?.triggers.push(trigger.clone());
        Ok(trigger)
    }

    fn delete_trigger(&self, project_id: u64, trigger_id: u64) -> Result<(), AppError> {
        self.record(format!("DELETE {} trigger {}", project_id, trigger_id))?;
        self.state.borrow_mut().by_id(project_id)?.triggers.retain(|t| t.id != trigger_id);
        Ok(())
    }

    fn list_hooks(&self, project_id: u64) -> Result<Vec<Webhook>, AppError> {
        self.record(format!("GET {} hooks", project_id))?;
        Ok(self.state.borrow_mut().by_id(project_id)?.hooks.clone())
    }

    fn create_hook(&self, project_id: u64, url: &str) -> Result<Webhook, AppError> {
        self.record(format!("POST {} hook", project_id))?;
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let hook = Webhook { id, url: url.to_string(), push_events: true };
        state.by_id(project_id)?.hooks.push(hook.clone());
        Ok(hook)
    }

    fn delete_hook(&self, project_id: u64, hook_id: u64) -> Result<(), AppError> {
        self.record(format!("DELETE {} hook {}", project_id, hook_id))?;
        self.state.borrow_mut().by_id(project_id)?.hooks.retain(|h| h.id != hook_id);
        Ok(())
    }

    fn list_deploy_keys(&self, project_id: u64) -> Result<Vec<DeployKey>, AppError> {
        self.record(format!("GET {} deploy keys", project_id))?;
        Ok(self.state.borrow_mut().by_id(project_id)?.deploy_keys.clone())
    }

    fn create_deploy_key(
        &self,
        project_id: u64,
        request: &NewDeployKey,
    ) -> Result<DeployKey, AppError> {
        self.record(format!("POST {} deploy key {}", project_id, request.title))?;
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let key = DeployKey {
            id,
            title: request.title.clone(),
            key: request.key.clone(),
            can_push: request.can_push,
        };
        state.by_id(project_id)?.deploy_keys.push(key.clone());
        Ok(key)
    }

    fn enable_deploy_key(&self, project_id: u64, key_id: u64) -> Result<DeployKey, AppError> {
        self.record(format!("POST {} deploy key {} enable", project_id, key_id))?;
        let mut state = self.state.borrow_mut();
        let key = state
            .projects
            .values()
            .flat_map(|p| p.deploy_keys.iter())
            .find(|k| k.id == key_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("deploy key {}", key_id)))?;
        let project = state.by_id(project_id)?;
        if !project.deploy_keys.iter().any(|k| k.id == key_id) {
            project.deploy_keys.push(DeployKey { can_push: false, ..key.clone() });
        }
        Ok(key)
    }

    fn update_deploy_key(
        &self,
        project_id: u64,
        key_id: u64,
        can_push: bool,
    ) -> Result<DeployKey, AppError> {
        self.record(format!("PUT {} deploy key {}", project_id, key_id))?;
        let mut state = self.state.borrow_mut();
        let key = state
            .by_id(project_id)?
            .deploy_keys
            .iter_mut()
            .find(|k| k.id == key_id)
            .ok_or_else(|| AppError::not_found(format!("deploy key {}", key_id)))?;
        key.can_push = can_push;
        Ok(key.clone())
    }

    fn delete_deploy_key(&self, project_id: u64, key_id: u64) -> Result<(), AppError> {
        self.record(format!("DELETE {} deploy key {}", project_id, key_id))?;
        self.state.borrow_mut().by_id(project_id)?.deploy_keys.retain(|k| k.id != key_id);
        Ok(())
    }

    fn list_pipeline_schedules(&self, project_id: u64) -> Result<Vec<PipelineSchedule>, AppError> {
        self.record(format!("GET {} schedules", project_id))?;
        Ok(self.state.borrow_mut().by_id(project_id)?.schedules.clone())
    }

    fn create_pipeline_schedule(
        &self,
        project_id: u64,
        request: &NewPipelineSchedule,
    ) -> Result<PipelineSchedule, AppError> {
        self.record(format!("POST {} schedule {}", project_id, request.description))?;
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let schedule = PipelineSchedule {
            id,
            description: request.description.clone(),
            git_ref: request.git_ref.clone(),
            cron: request.cron.clone(),
            active: request.active,
            next_run_at: None,
        };
        state.by_id(project_id)?.schedules.push(schedule.clone());
        Ok(schedule)
    }

    fn create_pipeline_schedule_variable(
        &self,
        project_id: u64,
        schedule_id: u64,
        key: &str,
        value: &str,
    ) -> Result<(), AppError> {
        self.record(format!("POST {} schedule {} variable {}", project_id, schedule_id, key))?;
        self.state
            .borrow_mut()
            .by_id(project_id)?
            .schedule_variables
            .entry(schedule_id)
            .or_default()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn delete_pipeline_schedule(&self, project_id: u64, schedule_id: u64) -> Result<(), AppError> {
        self.record(format!("DELETE {} schedule {}", project_id, schedule_id))?;
        let mut state = self.state.borrow_mut();
        let project = state.by_id(project_id)?;
        project.schedules.retain(|s| s.id != schedule_id);
        project.schedule_variables.remove(&schedule_id);
        Ok(())
    }

    fn trigger_pipeline(
        &self,
        project_id: u64,
        request: &PipelineTriggerRequest,
    ) -> Result<Pipeline, AppError> {
        self.record(format!("POST {} trigger pipeline", project_id))?;
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let project = state.by_id(project_id)?;
        if !project.triggers.iter().any(|t| t.token == request.token) {
            return Err(AppError::not_found("pipeline trigger token"));
        }
        let pipeline = Pipeline {
            id,
            status: "created".to_string(),
            git_ref: request.git_ref.clone(),
            web_url: Some(format!("{}/-/pipelines/{}", project.project.web_url, id)),
            created_at: None,
        };
        project.fired.push(request.clone());
        project.pipelines.push(pipeline.clone());
        Ok(pipeline)
    }

    fn list_pipelines(&self, project_id: u64, status: &str) -> Result<Vec<Pipeline>, AppError> {
        self.record(format!("GET {} pipelines {}", project_id, status))?;
        let mut state = self.state.borrow_mut();
        Ok(state
            .by_id(project_id)?
            .pipelines
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    fn cancel_pipeline(&self, project_id: u64, pipeline_id: u64) -> Result<Pipeline, AppError> {
        self.record(format!("POST {} pipeline {} cancel", project_id, pipeline_id))?;
        let mut state = self.state.borrow_mut();
        let pipeline = state
            .by_id(project_id)?
            .pipelines
            .iter_mut()
            .find(|p| p.id == pipeline_id)
            .ok_or_else(|| AppError::not_found(format!("pipeline {}", pipeline_id)))?;
        pipeline.status = "canceled".to_string();
        Ok(pipeline.clone())
    }

    fn list_jobs(&self, project_id: u64, limit: usize) -> Result<Vec<Job>, AppError> {
        self.record(format!("GET {} jobs", project_id))?;
        let mut state = self.state.borrow_mut();
        Ok(state.by_id(project_id)?.jobs.iter().rev().take(limit).map(|(j, _)| j.clone()).collect())
    }

    fn job_trace(&self, project_id: u64, job_id: u64) -> Result<String, AppError> {
        self.record(format!("GET {} job {} trace", project_id, job_id))?;
        let mut state = self.state.borrow_mut();
        state
            .by_id(project_id)?
            .jobs
            .iter()
            .find(|(j, _)| j.id == job_id)
            .map(|(_, trace)| trace.clone())
            .ok_or_else(|| AppError::not_found(format!("job {}", job_id)))
    }
}

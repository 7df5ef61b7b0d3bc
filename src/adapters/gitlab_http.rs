//! GitLab REST API v4 client implementation using reqwest.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{
    AppError, CiVariable, Credentials, DeployKey, GitLabConfig, Job, Namespace, NewDeployKey,
    NewPipelineSchedule, NewProject, Pipeline, PipelineSchedule, PipelineTriggerRequest, Project,
    ProjectPath, Trigger, User, Webhook,
};
use crate::ports::GitLabApi;

const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const NEXT_PAGE_HEADER: &str = "X-Next-Page";
const PER_PAGE: usize = 100;

/// HTTP client for the GitLab REST API.
#[derive(Clone)]
pub struct HttpGitLabClient {
    api_base: Url,
    credentials: Credentials,
    client: Client,
}

impl std::fmt::Debug for HttpGitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGitLabClient")
            .field("api_base", &self.api_base.as_str())
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl HttpGitLabClient {
    /// Create a new HTTP client for the configured instance.
    pub fn new(config: &GitLabConfig, credentials: Credentials) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        let api_base = Url::parse(&config.api_base())
            .map_err(|e| AppError::Configuration(format!("Invalid GitLab URL: {}", e)))?;

        Ok(Self { api_base, credentials, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration(format!("Invalid GitLab URL: {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder, endpoint: &Url) -> Result<Response, AppError> {
        let response = request
            .header(PRIVATE_TOKEN_HEADER, self.credentials.private_token())
            .send()
            .map_err(|e| AppError::Network(format!("{}: {}", endpoint.path(), e)))?;

        let status = response.status();
        tracing::debug!(target: "dbnomics_ci::http", status = status.as_u16(), "{}", endpoint.path());

        if status.is_success() {
            return Ok(response);
        }

        let path = endpoint.path().to_string();
        match status {
            StatusCode::UNAUTHORIZED => {
                Err(AppError::Authorization(format!("token rejected on {} (401)", path)))
            }
            StatusCode::FORBIDDEN => {
                Err(AppError::Authorization(format!("insufficient privilege on {} (403)", path)))
            }
            StatusCode::NOT_FOUND => Err(AppError::NotFound(path)),
            _ => {
                let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
                Err(AppError::Api { status: status.as_u16(), endpoint: path, message })
            }
        }
    }

    fn parse<T: DeserializeOwned>(response: Response, endpoint: &Url) -> Result<T, AppError> {
        response.json().map_err(|e| AppError::Api {
            status: 200,
            endpoint: endpoint.path().to_string(),
            message: format!("Failed to parse response: {}", e),
        })
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(target: "dbnomics_ci::http", "GET {}", url.path());
        let response = self.send(self.client.get(url.clone()), &url)?;
        Self::parse(response, &url)
    }

    /// Fetch every page of a list endpoint, following `X-Next-Page`.
    fn get_all<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, AppError> {
        self.get_pages(segments, query, usize::MAX)
    }

    /// Fetch pages of a list endpoint until `limit` items are read or pages run out.
    fn get_pages<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        limit: usize,
    ) -> Result<Vec<T>, AppError> {
        let url = self.endpoint(segments)?;
        let per_page = limit.clamp(1, PER_PAGE).to_string();
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            tracing::debug!(target: "dbnomics_ci::http", page = %page, "GET {}", url.path());
            let request = self
                .client
                .get(url.clone())
                .query(query)
                .query(&[("per_page", per_page.as_str()), ("page", page.as_str())]);
            let response = self.send(request, &url)?;
            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let mut batch: Vec<T> = Self::parse(response, &url)?;
            items.append(&mut batch);
            if items.len() >= limit {
                items.truncate(limit);
                break;
            }

            match next_page {
                Some(next) if next != page => page = next,
                _ => break,
            }
        }

        Ok(items)
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(target: "dbnomics_ci::http", "POST {}", url.path());
        let response = self.send(self.client.post(url.clone()).json(body), &url)?;
        Self::parse(response, &url)
    }

    fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(target: "dbnomics_ci::http", "PUT {}", url.path());
        let response = self.send(self.client.put(url.clone()).json(body), &url)?;
        Self::parse(response, &url)
    }

    fn delete(&self, segments: &[&str]) -> Result<(), AppError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(target: "dbnomics_ci::http", "DELETE {}", url.path());
        self.send(self.client.delete(url.clone()), &url)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct VariableBody<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct VariableValueBody<'a> {
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct TriggerBody<'a> {
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct HookBody<'a> {
    url: &'a str,
    push_events: bool,
}

#[derive(Debug, Serialize)]
struct DeployKeyBody<'a> {
    title: &'a str,
    key: &'a str,
    can_push: bool,
}

#[derive(Debug, Serialize)]
struct DeployKeyAccessBody {
    can_push: bool,
}

#[derive(Debug, Serialize)]
struct ScheduleBody<'a> {
    description: &'a str,
    #[serde(rename = "ref")]
    git_ref: &'a str,
    cron: &'a str,
    active: bool,
}

#[derive(Debug, Serialize)]
struct ProjectBody<'a> {
    name: &'a str,
    namespace_id: u64,
    description: &'a str,
    visibility: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct Ignored {}

impl GitLabApi for HttpGitLabClient {
    fn current_user(&self) -> Result<User, AppError> {
        self.get(&["user"])
    }

    fn project(&self, path: &ProjectPath) -> Result<Project, AppError> {
        self.get(&["projects", path.as_str()]).map_err(|e| match e {
            AppError::NotFound(_) => AppError::not_found(format!("project '{}'", path)),
            other => other,
        })
    }

    fn create_project(&self, request: &NewProject) -> Result<Project, AppError> {
        let body = ProjectBody {
            name: &request.name,
            namespace_id: request.namespace_id,
            description: &request.description,
            visibility: request.visibility.as_str(),
        };
        self.post(&["projects"], &body)
    }

    fn list_group_projects(&self, group: &str) -> Result<Vec<Project>, AppError> {
        self.get_all(&["groups", group, "projects"], &[("order_by", "name"), ("sort", "asc")])
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::not_found(format!("group '{}'", group)),
                other => other,
            })
    }

    fn find_namespace(&self, full_path: &str) -> Result<Option<Namespace>, AppError> {
        let name = full_path.rsplit('/').next().unwrap_or(full_path);
        let namespaces: Vec<Namespace> = self.get_all(&["namespaces"], &[("search", name)])?;
        Ok(namespaces.into_iter().find(|namespace| namespace.full_path == full_path))
    }

    fn list_variables(&self, project_id: u64) -> Result<Vec<CiVariable>, AppError> {
        self.get_all(&["projects", &project_id.to_string(), "variables"], &[])
    }

    fn create_variable(&self, project_id: u64, key: &str, value: &str) -> Result<(), AppError> {
        let _: Ignored =
            self.post(&["projects", &project_id.to_string(), "variables"], &VariableBody { key, value })?;
        Ok(())
    }

    fn update_variable(&self, project_id: u64, key: &str, value: &str) -> Result<(), AppError> {
        let _: Ignored = self.put(
            &["projects", &project_id.to_string(), "variables", key],
            &VariableValueBody { value },
        )?;
        Ok(())
    }

    fn delete_variable(&self, project_id: u64, key: &str) -> Result<(), AppError> {
        self.delete(&["projects", &project_id.to_string(), "variables", key])
    }

    fn list_triggers(&self, project_id: u64) -> Result<Vec<Trigger>, AppError> {
        self.get_all(&["projects", &project_id.to_string(), "triggers"], &[])
    }

    fn create_trigger(&self, project_id: u64, description: &str) -> Result<Trigger, AppError> {
        self.post(&["projects", &project_id.to_string(), "triggers"], &TriggerBody { description })
    }

    fn delete_trigger(&self, project_id: u64, trigger_id: u64) -> Result<(), AppError> {
        self.delete(&["projects", &project_id.to_string(), "triggers", &trigger_id.to_string()])
    }

    fn list_hooks(&self, project_id: u64) -> Result<Vec<Webhook>, AppError> {
        self.get_all(&["projects", &project_id.to_string(), "hooks"], &[])
    }

    fn create_hook(&self, project_id: u64, url: &str) -> Result<Webhook, AppError> {
        self.post(&["projects", &project_id.to_string(), "hooks"], &HookBody { url, push_events: true })
    }

    fn delete_hook(&self, project_id: u64, hook_id: u64) -> Result<(), AppError> {
        self.delete(&["projects", &project_id.to_string(), "hooks", &hook_id.to_string()])
    }

    fn list_deploy_keys(&self, project_id: u64) -> Result<Vec<DeployKey>, AppError> {
        self.get_all(&["projects", &project_id.to_string(), "deploy_keys"], &[])
    }

    fn create_deploy_key(
        &self,
        project_id: u64,
        request: &NewDeployKey,
    ) -> Result<DeployKey, AppError> {
        let body =
            DeployKeyBody { title: &request.title, key: &request.key, can_push: request.can_push };
        self.post(&["projects", &project_id.to_string(), "deploy_keys"], &body)
    }

    fn enable_deploy_key(&self, project_id: u64, key_id: u64) -> Result<DeployKey, AppError> {
        self.post(
            &["projects", &project_id.to_string(), "deploy_keys", &key_id.to_string(), "enable"],
            &serde_json::json!({}),
        )
    }

    fn update_deploy_key(
        &self,
        project_id: u64,
        key_id: u64,
        can_push: bool,
    ) -> Result<DeployKey, AppError> {
        self.put(
            &["projects", &project_id.to_string(), "deploy_keys", &key_id.to_string()],
            &DeployKeyAccessBody { can_push },
        )
    }

    fn delete_deploy_key(&self, project_id: u64, key_id: u64) -> Result<(), AppError> {
        self.delete(&["projects", &project_id.to_string(), "deploy_keys", &key_id.to_string()])
    }

    fn list_pipeline_schedules(&self, project_id: u64) -> Result<Vec<PipelineSchedule>, AppError> {
        self.get_all(&["projects", &project_id.to_string(), "pipeline_schedules"], &[])
    }

    fn create_pipeline_schedule(
        &self,
        project_id: u64,
        request: &NewPipelineSchedule,
    ) -> Result<PipelineSchedule, AppError> {
        let body = ScheduleBody {
            description: &request.description,
            git_ref: &request.git_ref,
            cron: &request.cron,
            active: request.active,
        };
        self.post(&["projects", &project_id.to_string(), "pipeline_schedules"], &body)
    }

    fn create_pipeline_schedule_variable(
        &self,
        project_id: u64,
        schedule_id: u64,
        key: &str,
        value: &str,
    ) -> Result<(), AppError> {
        let _: Ignored = self.post(
            &[
                "projects",
                &project_id.to_string(),
                "pipeline_schedules",
                &schedule_id.to_string(),
                "variables",
            ],
            &VariableBody { key, value },
        )?;
        Ok(())
    }

    fn delete_pipeline_schedule(&self, project_id: u64, schedule_id: u64) -> Result<(), AppError> {
        self.delete(&[
            "projects",
            &project_id.to_string(),
            "pipeline_schedules",
            &schedule_id.to_string(),
        ])
    }

    fn trigger_pipeline(
        &self,
        project_id: u64,
        request: &PipelineTriggerRequest,
    ) -> Result<Pipeline, AppError> {
        let url = self.endpoint(&["projects", &project_id.to_string(), "trigger", "pipeline"])?;
        let mut form = vec![
            ("token".to_string(), request.token.clone()),
            ("ref".to_string(), request.git_ref.clone()),
        ];
        for (key, value) in &request.variables {
            form.push((format!("variables[{}]", key), value.clone()));
        }

        tracing::debug!(target: "dbnomics_ci::http", "POST {}", url.path());
        let response = self.send(self.client.post(url.clone()).form(&form), &url)?;
        Self::parse(response, &url)
    }

    fn list_pipelines(&self, project_id: u64, status: &str) -> Result<Vec<Pipeline>, AppError> {
        self.get_all(&["projects", &project_id.to_string(), "pipelines"], &[("status", status)])
    }

    fn cancel_pipeline(&self, project_id: u64, pipeline_id: u64) -> Result<Pipeline, AppError> {
        self.post(
            &["projects", &project_id.to_string(), "pipelines", &pipeline_id.to_string(), "cancel"],
            &serde_json::json!({}),
        )
    }

    fn list_jobs(&self, project_id: u64, limit: usize) -> Result<Vec<Job>, AppError> {
        self.get_pages(&["projects", &project_id.to_string(), "jobs"], &[], limit)
    }

    fn job_trace(&self, project_id: u64, job_id: u64) -> Result<String, AppError> {
        let url =
            self.endpoint(&["projects", &project_id.to_string(), "jobs", &job_id.to_string(), "trace"])?;
        tracing::debug!(target: "dbnomics_ci::http", "GET {}", url.path());
        let response = self.send(self.client.get(url.clone()), &url)?;
        response.text().map_err(|e| AppError::Network(format!("{}: {}", url.path(), e)))
    }
}

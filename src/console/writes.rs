//! Mutation constructors
//!
//! Each constructor wires one write operation to its fixed notification
//! messages and its declared invalidations. Sign-in mutations additionally
//! persist the session (token, role string) as an on-success side effect,
//! before any notification fires.

use super::Console;
use crate::query::{Mutation, WriteOp};
use crate::types::{
    ChangeRoleRequest, Cluster, ConnectClusterRequest, CreateDeploymentRequest,
    CreateProjectRequest, Credentials, Deployment, InviteMemberRequest, Project, ProjectToken,
    Session, SignupRequest, TokenUpdateRequest, UpdateDeploymentRequest, WorkspaceMember,
};
use log::warn;
use serde_json::Value;

impl Console {
    fn mutation<Req, Res>(
        &self,
        op: WriteOp,
        success: &'static str,
        fallback: &'static str,
        run: impl Fn(&Req) -> crate::error::Result<Res> + Send + Sync + 'static,
    ) -> Mutation<Req, Res> {
        Mutation::new(
            op,
            success,
            fallback,
            self.cache.clone(),
            self.notifier.clone(),
            self.invalidations.clone(),
            run,
        )
    }

    /// Store the session locally: token first, then the raw role string the
    /// role store derives from
    fn session_side_effect(&self) -> impl Fn(&Session) + Send + Sync + 'static {
        let tokens = self.tokens.clone();
        let roles = self.roles.clone();
        move |session: &Session| {
            if let Err(e) = tokens.set_token(&session.token) {
                warn!("Failed to persist auth token: {e}");
            }
            if let Some(role) = &session.role {
                if let Err(e) = roles.remember(role) {
                    warn!("Failed to persist workspace role: {e}");
                }
            }
        }
    }

    // =========================================================================
    // Clusters
    // =========================================================================

    pub fn connect_cluster_mutation(&self) -> Mutation<ConnectClusterRequest, Cluster> {
        let client = self.clusters.clone();
        self.mutation(
            WriteOp::ConnectCluster,
            "Cluster connected",
            "Failed to connect cluster",
            move |req| client.connect(req),
        )
    }

    pub fn remove_cluster_mutation(&self) -> Mutation<u64, Value> {
        let client = self.clusters.clone();
        self.mutation(
            WriteOp::RemoveCluster,
            "Cluster removed",
            "Failed to remove cluster",
            move |id| client.remove(*id),
        )
    }

    // =========================================================================
    // Deployments
    // =========================================================================

    pub fn create_deployment_mutation(&self) -> Mutation<CreateDeploymentRequest, Deployment> {
        let client = self.deployments.clone();
        self.mutation(
            WriteOp::CreateDeployment,
            "Deployment created",
            "Failed to create deployment",
            move |req| client.create(req),
        )
    }

    pub fn update_deployment_mutation(&self) -> Mutation<UpdateDeploymentRequest, Deployment> {
        let client = self.deployments.clone();
        self.mutation(
            WriteOp::UpdateDeployment,
            "Deployment updated",
            "Failed to update deployment",
            move |req| client.update(req),
        )
    }

    pub fn delete_deployment_mutation(&self) -> Mutation<u64, Value> {
        let client = self.deployments.clone();
        self.mutation(
            WriteOp::DeleteDeployment,
            "Deployment deleted",
            "Failed to delete deployment",
            move |id| client.delete(*id),
        )
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub fn create_project_mutation(&self) -> Mutation<CreateProjectRequest, Project> {
        let client = self.projects.clone();
        self.mutation(
            WriteOp::CreateProject,
            "Project created",
            "Failed to create project",
            move |req: &CreateProjectRequest| client.create(&req.name, &req.environment),
        )
    }

    pub fn delete_project_mutation(&self) -> Mutation<u64, Value> {
        let client = self.projects.clone();
        self.mutation(
            WriteOp::DeleteProject,
            "Project deleted",
            "Failed to delete project",
            move |id| client.delete(*id),
        )
    }

    pub fn update_token_mutation(&self) -> Mutation<TokenUpdateRequest, ProjectToken> {
        let client = self.projects.clone();
        self.mutation(
            WriteOp::UpdateProjectToken,
            "Project token updated",
            "Failed to update project token",
            move |req| client.update_token(req),
        )
    }

    // =========================================================================
    // Workspace
    // =========================================================================

    pub fn invite_member_mutation(&self) -> Mutation<InviteMemberRequest, WorkspaceMember> {
        let client = self.workspace.clone();
        self.mutation(
            WriteOp::InviteMember,
            "Invitation sent",
            "Failed to send invitation",
            move |req: &InviteMemberRequest| client.invite(&req.email, &req.role),
        )
    }

    pub fn remove_member_mutation(&self) -> Mutation<u64, Value> {
        let client = self.workspace.clone();
        self.mutation(
            WriteOp::RemoveMember,
            "Member removed",
            "Failed to remove member",
            move |id| client.remove(*id),
        )
    }

    pub fn change_role_mutation(&self) -> Mutation<ChangeRoleRequest, WorkspaceMember> {
        let client = self.workspace.clone();
        self.mutation(
            WriteOp::ChangeMemberRole,
            "Member role updated",
            "Failed to update member role",
            move |req: &ChangeRoleRequest| client.change_role(req.member_id, &req.role),
        )
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub fn login_mutation(&self) -> Mutation<Credentials, Session> {
        let client = self.auth.clone();
        self.mutation(
            WriteOp::Login,
            "Signed in",
            "Sign-in failed",
            move |creds| client.login(creds),
        )
        .with_side_effect(self.session_side_effect())
    }

    pub fn signup_mutation(&self) -> Mutation<SignupRequest, Session> {
        let client = self.auth.clone();
        self.mutation(
            WriteOp::Signup,
            "Account created",
            "Sign-up failed",
            move |req| client.signup(req),
        )
        .with_side_effect(self.session_side_effect())
    }
}

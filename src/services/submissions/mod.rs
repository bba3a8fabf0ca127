pub mod create;
pub mod list;
pub mod precheck;
pub mod review;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::auth::entities::AuthUser;
use crate::models::submissions::entities::StudentIdentity;
use crate::models::submissions::requests::{
    SetCheckedRequest, SetFeedbackRequest, SubmissionCheckRequest, SubmissionListParams,
};
use crate::objstore::ObjectStore;
use crate::storage::Storage;
use crate::utils::validate::validate_student_name;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_object_store(&self, request: &HttpRequest) -> Arc<dyn ObjectStore> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectStore>>>()
            .expect("Object store not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 创建提交（multipart：文件 + 身份 + 备注）
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, assignment_id, payload).await
    }

    /// 提交前置检查（幂等）
    pub async fn check_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        req: SubmissionCheckRequest,
    ) -> ActixResult<HttpResponse> {
        precheck::check_submission(self, request, assignment_id, req).await
    }

    /// 列出提交
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, assignment_id, query).await
    }

    /// 批改：切换检查状态
    pub async fn set_checked(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_id: i64,
        req: SetCheckedRequest,
    ) -> ActixResult<HttpResponse> {
        review::set_checked(self, request, assignment_id, submission_id, req).await
    }

    /// 批改：替换反馈
    pub async fn set_feedback(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_id: i64,
        req: SetFeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        review::set_feedback(self, request, assignment_id, submission_id, req).await
    }
}

/// 解析提交者身份
///
/// 已登录调用方按用户 ID 追踪；访客要求提供名字。
/// 两者都没有时返回错误消息交由调用方拒绝。
pub(crate) fn resolve_student_identity(
    current_user: Option<&AuthUser>,
    student_name: Option<&str>,
) -> Result<StudentIdentity, &'static str> {
    if let Some(user) = current_user {
        return Ok(StudentIdentity::Registered {
            id: user.id,
            name: user.name.clone(),
        });
    }

    let name = student_name.unwrap_or("").trim();
    validate_student_name(name)?;
    Ok(StudentIdentity::Guest {
        name: name.to_string(),
    })
}

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{SubmissionService, resolve_student_identity};
use crate::config::AppConfig;
use crate::errors::CourseHubError;
use crate::middlewares::identity::Identity;
use crate::models::submissions::requests::NewSubmission;
use crate::models::{ApiResponse, ErrorCode};
use crate::objstore::{ObjectStore, put_object_with_timeout};
use crate::services::storage_error_response;
use crate::utils::validate_magic_bytes;

/// 解析后的提交载荷
struct SubmissionUpload {
    file_name: String,
    data: Vec<u8>,
    student_name: Option<String>,
    comment: Option<String>,
}

/// 读取 multipart 载荷
///
/// 文件流式读入内存，第一个分块校验魔术字节，超过大小上限立即中断。
async fn read_multipart(mut payload: Multipart) -> Result<SubmissionUpload, HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.object_store.max_file_size;
    let allowed_types = &config.object_store.allowed_types;

    let mut file_name = String::new();
    let mut data: Vec<u8> = Vec::new();
    let mut file_seen = false;
    let mut student_name: Option<String> = None;
    let mut comment: Option<String> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if file_seen {
                    return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::InvalidParams,
                        "一次只能上传一个文件",
                    )));
                }
                file_seen = true;

                // 先获取原始文件名
                file_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                // 提取扩展名并校验
                let extension = Path::new(&file_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| format!(".{}", ext.to_lowercase()))
                    .unwrap_or_default();

                if !allowed_types.iter().any(|t| t.to_lowercase() == extension) {
                    return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::InvalidParams,
                        "不支持的文件类型",
                    )));
                }

                let mut first_chunk = true;
                while let Some(chunk) = field.next().await {
                    let bytes = match chunk {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            warn!("Failed to read upload chunk: {}", e);
                            return Err(HttpResponse::BadRequest().json(
                                ApiResponse::error_empty(
                                    ErrorCode::InvalidParams,
                                    "读取上传内容失败",
                                ),
                            ));
                        }
                    };

                    // 第一个 chunk 时验证魔术字节
                    if first_chunk {
                        first_chunk = false;
                        if !validate_magic_bytes(&bytes, &extension) {
                            return Err(HttpResponse::BadRequest().json(
                                ApiResponse::error_empty(
                                    ErrorCode::InvalidParams,
                                    "文件内容与扩展名不匹配",
                                ),
                            ));
                        }
                    }

                    if data.len() + bytes.len() > max_size {
                        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::InvalidParams,
                            "文件大小超过限制",
                        )));
                    }
                    data.extend_from_slice(&bytes);
                }
            }
            "student_name" => {
                student_name = read_text_field(&mut field).await;
            }
            "comment" => {
                comment = read_text_field(&mut field).await;
            }
            _ => {
                // 未知字段直接丢弃
                while field.next().await.is_some() {}
            }
        }
    }

    if !file_seen || data.is_empty() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "提交必须包含一个文件",
        )));
    }

    Ok(SubmissionUpload {
        file_name,
        data,
        student_name,
        comment,
    })
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Option<String> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(Ok(bytes)) = field.next().await {
        buf.extend_from_slice(&bytes);
    }
    String::from_utf8(buf).ok().filter(|s| !s.is_empty())
}

/// 创建提交
///
/// 拒绝检查顺序：作业不存在 → 截止 → 容量 → 次数上限。
/// 文件先上传到对象存储（不持有任何数据库锁），之后由台账事务
/// 复核次数与容量并写入提交行；事务拒绝时尽力回收已上传对象。
pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let storage = service.get_storage(request);
    let current_user = Identity::extract_user(request);

    let upload = match read_multipart(payload).await {
        Ok(upload) => upload,
        Err(resp) => return Ok(resp),
    };

    // 身份解析：登录用户优先，访客按名字
    let identity =
        match resolve_student_identity(current_user.as_ref(), upload.student_name.as_deref()) {
            Ok(identity) => identity,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)));
            }
        };

    // 1. 作业是否存在
    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response(e)),
    };

    // 2. 截止时间
    if let Some(due_date) = assignment.due_date
        && chrono::Utc::now() > due_date
    {
        debug!("Submission after deadline for assignment {}", assignment_id);
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::DeadlineExceeded,
            "作业已过截止时间",
        )));
    }

    // 3. 容量快照检查（权威判定在台账事务里）
    if assignment.remaining_capacity() == Some(0) {
        debug!("Assignment {} already at capacity", assignment_id);
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::CapacityExceeded,
            "作业已达到提交容量上限",
        )));
    }

    // 4. 次数上限快照检查
    let attempt_cap = config.submission.attempt_cap;
    match storage.count_attempts(assignment_id, &identity).await {
        Ok(used) if attempt_cap > 0 && used >= attempt_cap => {
            debug!(
                "Attempt cap reached for {} on assignment {}",
                identity.display_name(),
                assignment_id
            );
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AttemptCapExceeded,
                format!("已达到提交次数上限（{attempt_cap} 次）"),
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(storage_error_response(e)),
    }

    // 5. 上传到对象存储（任何数据库锁之外，带超时）
    let object_store = service.get_object_store(request);
    let stored = match put_object_with_timeout(
        object_store.as_ref(),
        &upload.file_name,
        upload.data,
    )
    .await
    {
        Ok(stored) => stored,
        Err(e) => return Ok(storage_error_response(e)),
    };

    // 6. 台账事务：复核并写入
    let input = NewSubmission {
        assignment_id,
        identity,
        file_url: stored.url,
        file_name: upload.file_name,
        comment: upload.comment,
    };

    match storage.record_submission(input, attempt_cap).await {
        Ok(submission) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "提交成功")))
        }
        Err(e) => {
            // 台账没写成，已上传的对象不能泄漏
            if matches!(
                e,
                CourseHubError::CapacityExceeded(_)
                    | CourseHubError::AttemptCapExceeded(_)
                    | CourseHubError::NotFound(_)
                    | CourseHubError::DatabaseOperation(_)
            ) {
                let store: Arc<dyn ObjectStore> = object_store.clone();
                let key = stored.key.clone();
                actix_web::rt::spawn(async move {
                    store.remove_object(&key).await;
                });
            }
            Ok(storage_error_response(e))
        }
    }
}

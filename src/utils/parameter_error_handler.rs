//! 请求参数错误处理器
//!
//! JSON 体或查询串解析失败时返回统一的 400 响应结构，
//! 而不是 actix 默认的纯文本错误。

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    let resp = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidParams,
        format!("请求体解析失败: {detail}"),
    ));
    InternalError::from_response(err, resp).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    let resp = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidParams,
        format!("查询参数解析失败: {detail}"),
    ));
    InternalError::from_response(err, resp).into()
}

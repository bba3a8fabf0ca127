//! 路径参数提取器
//!
//! 非法 ID（非数字、越界、负数）在进入业务层之前以统一的 400 响应拒绝。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! define_safe_id_extractor {
    ($(
        $name:ident($param:literal)
    ),* $(,)?) => {
        $(
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                    let parsed = req
                        .match_info()
                        .get($param)
                        .and_then(|raw| raw.parse::<i64>().ok())
                        .filter(|id| *id > 0);

                    ready(match parsed {
                        Some(id) => Ok($name(id)),
                        None => {
                            let resp = HttpResponse::BadRequest().json(
                                ApiResponse::error_empty(
                                    ErrorCode::InvalidParams,
                                    concat!("无效的路径参数: ", $param),
                                ),
                            );
                            Err(InternalError::from_response(
                                concat!("invalid path parameter: ", $param),
                                resp,
                            )
                            .into())
                        }
                    })
                }
            }
        )*
    };
}

define_safe_id_extractor! {
    SafeIDI64("id"),
    SafeAssignmentIdI64("assignment_id"),
}

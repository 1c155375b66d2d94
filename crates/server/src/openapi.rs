use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SignupRequest { pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct ApiMessageDoc { pub success: bool, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::home,
        crate::routes::health,
        crate::routes::users::signup,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequest,
            ApiMessageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;

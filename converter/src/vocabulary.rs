//! @ai:module:intent Qualified names of the legacy and OpenAPI annotation vocabularies
//! @ai:module:layer domain
//! @ai:module:public_api legacy, openapi, marker, container
//! @ai:module:stateless true

/// Swagger 1.x annotations being removed.
pub mod legacy {
    pub const PACKAGE: &str = "io.swagger.annotations";
    pub const API: &str = "io.swagger.annotations.Api";
    pub const API_OPERATION: &str = "io.swagger.annotations.ApiOperation";
    pub const API_MODEL_PROPERTY: &str = "io.swagger.annotations.ApiModelProperty";
    pub const API_PARAM: &str = "io.swagger.annotations.ApiParam";
    pub const API_RESPONSES: &str = "io.swagger.annotations.ApiResponses";
    pub const API_RESPONSE: &str = "io.swagger.annotations.ApiResponse";

    /// @ai:intent Every annotation the converter knows how to remove
    pub const ALL: &[&str] = &[
        API,
        API_OPERATION,
        API_MODEL_PROPERTY,
        API_PARAM,
        API_RESPONSES,
        API_RESPONSE,
    ];
}

/// OpenAPI 3 annotations being produced.
pub mod openapi {
    pub const TAG: &str = "io.swagger.v3.oas.annotations.tags.Tag";
    pub const HIDDEN: &str = "io.swagger.v3.oas.annotations.Hidden";
    pub const OPERATION: &str = "io.swagger.v3.oas.annotations.Operation";
    pub const PARAMETER: &str = "io.swagger.v3.oas.annotations.Parameter";
    pub const SCHEMA: &str = "io.swagger.v3.oas.annotations.media.Schema";
    pub const ARRAY_SCHEMA: &str = "io.swagger.v3.oas.annotations.media.ArraySchema";
    pub const CONTENT: &str = "io.swagger.v3.oas.annotations.media.Content";
    pub const API_RESPONSE: &str = "io.swagger.v3.oas.annotations.responses.ApiResponse";
}

/// Texts of comments inserted for manual follow-up.
pub mod marker {
    pub const CHECK_GENERICS: &str = "check generics";
    pub const TRANSFORM_TO_MAP: &str = "transform to map";
    pub const EXTERNALIZE: &str = "externalize";
}

/// Values of `responseContainer` and the collection types recognised on return types.
pub mod container {
    pub const LIST: &str = "List";
    pub const SET: &str = "Set";
    pub const MAP: &str = "Map";

    pub const JAVA_LIST: &str = "java.util.List";
    pub const JAVA_SET: &str = "java.util.Set";
    pub const JAVA_COLLECTION: &str = "java.util.Collection";
}

/// Media-type annotation consulted when no configuration overrides it.
pub const DEFAULT_MEDIA_TYPE_ANNOTATION: &str = "javax.ws.rs.Produces";

/// HTTP status whose response receives default content.
pub const OK_STATUS: &str = "200";

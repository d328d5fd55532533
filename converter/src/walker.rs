//! @ai:module:intent Walk a compilation unit and apply every rewriter to every declaration
//! @ai:module:layer application
//! @ai:module:public_api convert_unit, convert_file, scan_unit, ConversionReport, MarkerNote, LegacyUse
//! @ai:module:depends_on rewrite, resolve, postprocess, config
//!
//! Classes are visited depth first: the class's own modifiers, then methods,
//! then fields, then nested classes, each in declaration order.

use crate::config::ConverterConfig;
use crate::error::Result;
use crate::names;
use crate::postprocess::{self, CodeStyle, DefaultCodeStyle, ImportChanges, ImportUsage};
use crate::resolve::TypeIndex;
use crate::rewrite::{api, model_property, operation, param, responses, MethodScope, RewriteContext};
use crate::tree::{ClassDecl, CompilationUnit, Member, MethodDecl, ModifierList, SourceFile, TypeInfo};
use crate::vocabulary::legacy;
use serde::Serialize;

/// @ai:intent What converting one unit did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Legacy annotations replaced.
    pub converted: usize,
    /// Nodes put in their place, markers included.
    pub inserted: usize,
    /// Qualified names of the nested types created for generic responses.
    pub synthesized: Vec<String>,
    pub markers: Vec<MarkerNote>,
    pub imports: ImportChanges,
}

impl ConversionReport {
    pub fn is_noop(&self) -> bool {
        self.converted == 0
    }
}

/// @ai:intent A marker comment left for manual review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerNote {
    pub declaration: String,
    pub text: String,
}

/// @ai:intent A legacy annotation still present in a unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyUse {
    pub declaration: String,
    pub annotation: String,
}

/// @ai:intent Convert a whole tree file using configured media types and post-processing
pub fn convert_file(file: &mut SourceFile, config: &ConverterConfig) -> Result<ConversionReport> {
    let style = DefaultCodeStyle::new(config.postprocess.clone());
    convert_unit(
        &mut file.unit,
        &file.types,
        &config.media_type_annotations,
        &style,
    )
}

/// @ai:intent Replace every legacy annotation in the unit, then run the post-processing pass
/// @ai:pre external holds the resolved declarations of types the unit references
/// @ai:post on error the unit may be partially converted; callers work on a copy
pub fn convert_unit(
    unit: &mut CompilationUnit,
    external: &[TypeInfo],
    media_type_annotations: &[String],
    style: &dyn CodeStyle,
) -> Result<ConversionReport> {
    let index = TypeIndex::build(unit, external);
    let baseline = ImportUsage::capture(unit);
    let mut ctx = RewriteContext::new(&index, media_type_annotations);

    let package = unit.package.clone().unwrap_or_default();
    for class in &mut unit.types {
        let qualified = names::join(&package, &class.name);
        let label = class.name.clone();
        convert_class(&mut ctx, class, &qualified, &label)?;
    }

    let (pending, mut report) = ctx.finish();
    report.imports = postprocess::run(unit, pending, style, &baseline);
    Ok(report)
}

fn convert_class(
    ctx: &mut RewriteContext<'_>,
    class: &mut ClassDecl,
    qualified: &str,
    label: &str,
) -> Result<()> {
    api::convert(ctx, &mut class.modifiers, label)?;

    let mut scope = MethodScope::for_class(class, qualified);
    let mut index = 0;
    while index < class.members.len() {
        if let Member::Method(method) = &mut class.members[index] {
            let declaration = format!("{}.{}", label, method.name);
            convert_method(ctx, &mut scope, method, &declaration)?;

            let synthesized = scope.take_synthesized();
            let count = synthesized.len();
            class.members.splice(index + 1..index + 1, synthesized);
            index += count;
        }
        index += 1;
    }

    for member in &mut class.members {
        if let Member::Field(field) = member {
            let declaration = format!("{}.{}", label, field.name);
            convert_member_metadata(ctx, &mut field.modifiers, &declaration)?;
        }
    }

    for member in &mut class.members {
        if let Member::Class(nested) = member {
            let nested_qualified = names::join(qualified, &nested.name);
            let nested_label = format!("{}.{}", label, nested.name);
            convert_class(ctx, nested, &nested_qualified, &nested_label)?;
        }
    }

    Ok(())
}

fn convert_method(
    ctx: &mut RewriteContext<'_>,
    scope: &mut MethodScope,
    method: &mut MethodDecl,
    declaration: &str,
) -> Result<()> {
    operation::convert(ctx, &mut method.modifiers, declaration)?;
    responses::convert(ctx, scope, method, declaration)?;
    convert_member_metadata(ctx, &mut method.modifiers, declaration)?;

    for parameter in &mut method.params {
        let declaration = format!("{}({})", declaration, parameter.name);
        convert_member_metadata(ctx, &mut parameter.modifiers, &declaration)?;
    }
    Ok(())
}

fn convert_member_metadata(
    ctx: &mut RewriteContext<'_>,
    modifiers: &mut ModifierList,
    declaration: &str,
) -> Result<()> {
    model_property::convert(ctx, modifiers, declaration)?;
    param::convert(ctx, modifiers, declaration)?;
    Ok(())
}

/// @ai:intent List legacy annotations left in a unit, in walk order
/// @ai:effects pure
pub fn scan_unit(unit: &CompilationUnit) -> Vec<LegacyUse> {
    let mut found = Vec::new();
    for class in &unit.types {
        scan_class(class, &class.name, &mut found);
    }
    found
}

fn scan_class(class: &ClassDecl, label: &str, found: &mut Vec<LegacyUse>) {
    scan_modifiers(&class.modifiers, label, found);
    for method in class.methods() {
        let declaration = format!("{}.{}", label, method.name);
        scan_modifiers(&method.modifiers, &declaration, found);
        for parameter in &method.params {
            let declaration = format!("{}({})", declaration, parameter.name);
            scan_modifiers(&parameter.modifiers, &declaration, found);
        }
    }
    for member in &class.members {
        if let Member::Field(field) = member {
            scan_modifiers(&field.modifiers, &format!("{}.{}", label, field.name), found);
        }
    }
    for nested in class.nested_classes() {
        scan_class(nested, &format!("{}.{}", label, nested.name), found);
    }
}

fn scan_modifiers(modifiers: &ModifierList, declaration: &str, found: &mut Vec<LegacyUse>) {
    for annotation in modifiers.annotations() {
        if legacy::ALL.contains(&annotation.name.as_str()) {
            found.push(LegacyUse {
                declaration: declaration.to_string(),
                annotation: annotation.simple_name().to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tree::{
        Annotation, ConstructorInfo, FieldDecl, Import, Modifier, ParamInfo, Parameter, TypeRef,
        Value, Visibility,
    };
    use crate::vocabulary::{marker, openapi};
    use pretty_assertions::assert_eq;

    fn page_info() -> TypeInfo {
        TypeInfo {
            name: "com.acme.Page".to_string(),
            type_params: vec!["T".to_string()],
            constructors: vec![ConstructorInfo {
                visibility: Visibility::Public,
                params: vec![ParamInfo {
                    name: "items".to_string(),
                    ty: TypeRef::class("java.util.List", vec![TypeRef::Variable("T".to_string())]),
                }],
            }],
        }
    }

    fn user_page() -> TypeRef {
        TypeRef::class("com.acme.Page", vec![TypeRef::named("com.acme.User")])
    }

    fn ok_page_response() -> Annotation {
        Annotation::new(legacy::API_RESPONSES).with_value(Value::Array(vec![Value::annotation(
            Annotation::new(legacy::API_RESPONSE)
                .with("code", Value::Number("200".to_string()))
                .with("response", Value::class(TypeRef::named("com.acme.Page"))),
        )]))
    }

    fn resource() -> SourceFile {
        let get = MethodDecl::new("getUser", TypeRef::named("com.acme.User"))
            .with_annotation(Annotation::new(legacy::API_OPERATION).with_value(Value::string("Get a user")))
            .with_annotation(Annotation::new(legacy::API_RESPONSES).with_value(Value::Array(vec![
                Value::annotation(
                    Annotation::new(legacy::API_RESPONSE)
                        .with("code", Value::Number("404".to_string()))
                        .with("message", Value::string("Not found")),
                ),
            ])))
            .with_param(
                Parameter::new("id", TypeRef::Primitive("long".to_string())).with_annotation(
                    Annotation::new(legacy::API_PARAM).with("value", Value::string("User id")),
                ),
            );

        let model = ClassDecl::new("UserView").with_field(
            FieldDecl::new("name", TypeRef::named("java.lang.String")).with_annotation(
                Annotation::new(legacy::API_MODEL_PROPERTY).with_value(Value::string("Display name")),
            ),
        );

        let class = ClassDecl::new("UserResource")
            .with_annotation(Annotation::new(legacy::API).with("tags", Value::string("users")))
            .with_method(get)
            .with_member(Member::Class(model));

        SourceFile {
            unit: CompilationUnit {
                package: Some("com.acme".to_string()),
                imports: vec![
                    Import::single(legacy::API),
                    Import::single(legacy::API_OPERATION),
                    Import::single(legacy::API_PARAM),
                    Import::single(legacy::API_MODEL_PROPERTY),
                    Import::single(legacy::API_RESPONSE),
                    Import::single(legacy::API_RESPONSES),
                ],
                types: vec![class],
            },
            types: vec![page_info()],
        }
    }

    #[test]
    fn test_unit_without_legacy_annotations_is_untouched() {
        let mut file = SourceFile {
            unit: CompilationUnit {
                package: Some("com.acme".to_string()),
                imports: vec![Import::single("java.util.List")],
                types: vec![ClassDecl::new("Plain")
                    .with_method(MethodDecl::new("list", TypeRef::named("java.util.List")))],
            },
            types: Vec::new(),
        };
        let before = file.clone();

        let report = convert_file(&mut file, &ConverterConfig::default()).unwrap();

        assert_eq!(file, before);
        assert!(report.is_noop());
        assert_eq!(report, ConversionReport::default());
    }

    #[test]
    fn test_resource_is_fully_converted() {
        let mut file = resource();
        let report = convert_file(&mut file, &ConverterConfig::default()).unwrap();

        assert!(scan_unit(&file.unit).is_empty());
        assert_eq!(report.converted, 5);

        let class = &file.unit.types[0];
        let tag = class.modifiers.annotation(openapi::TAG).unwrap();
        assert_eq!(tag.get("name"), Some(&Value::string("users")));

        let method = class.methods().next().unwrap();
        let operation = method.modifiers.annotation(openapi::OPERATION).unwrap();
        assert_eq!(operation.get("summary"), Some(&Value::string("Get a user")));
        let responses: Vec<_> = method
            .modifiers
            .annotations()
            .filter(|a| a.name == openapi::API_RESPONSE)
            .map(|a| a.get("responseCode").cloned())
            .collect();
        assert_eq!(
            responses,
            vec![Some(Value::string("404")), Some(Value::string("200"))]
        );
        assert!(method.params[0].modifiers.has_annotation(openapi::PARAMETER));

        let nested = class.nested_classes().next().unwrap();
        let field = match &nested.members[0] {
            Member::Field(field) => field,
            other => panic!("expected field, got {:?}", other),
        };
        assert!(field.modifiers.has_annotation(openapi::SCHEMA));

        let imports: Vec<_> = file.unit.imports.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            imports,
            vec![
                openapi::TAG,
                openapi::OPERATION,
                openapi::API_RESPONSE,
                openapi::CONTENT,
                openapi::SCHEMA,
                openapi::PARAMETER,
            ]
        );
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut file = resource();
        convert_file(&mut file, &ConverterConfig::default()).unwrap();
        let converted = file.clone();

        let report = convert_file(&mut file, &ConverterConfig::default()).unwrap();

        assert!(report.is_noop());
        assert_eq!(file, converted);
    }

    #[test]
    fn test_synthesized_type_follows_method_and_is_reused() {
        let first = MethodDecl::new("page", user_page()).with_annotation(ok_page_response());
        let second = MethodDecl::new("search", user_page()).with_annotation(ok_page_response());
        let mut file = SourceFile {
            unit: CompilationUnit {
                package: Some("com.acme".to_string()),
                imports: Vec::new(),
                types: vec![ClassDecl::new("UserResource")
                    .with_method(first)
                    .with_method(second)],
            },
            types: vec![page_info()],
        };

        let report = convert_file(&mut file, &ConverterConfig::default()).unwrap();
        let members = &file.unit.types[0].members;

        assert_eq!(report.synthesized, vec!["com.acme.UserResource.UserPage".to_string()]);
        assert_eq!(members.len(), 4);
        assert!(matches!(&members[0], Member::Method(m) if m.name == "page"));
        assert!(matches!(&members[1], Member::Comment(c) if c.text == marker::EXTERNALIZE));
        assert!(matches!(&members[2], Member::Class(c) if c.name == "UserPage"));
        assert!(matches!(&members[3], Member::Method(m) if m.name == "search"));
        assert!(members.iter().all(|m| match m {
            Member::Class(c) => c.id.is_none(),
            Member::Comment(c) => c.id.is_none(),
            _ => true,
        }));
    }

    #[test]
    fn test_ambiguous_generic_leaves_single_marker() {
        let method = MethodDecl::new("raw", TypeRef::named("javax.ws.rs.core.Response"))
            .with_annotation(ok_page_response());
        let mut file = SourceFile {
            unit: CompilationUnit {
                package: Some("com.acme".to_string()),
                imports: Vec::new(),
                types: vec![ClassDecl::new("UserResource").with_method(method)],
            },
            types: vec![page_info()],
        };

        let report = convert_file(&mut file, &ConverterConfig::default()).unwrap();

        assert!(report.synthesized.is_empty());
        assert_eq!(
            report.markers,
            vec![MarkerNote {
                declaration: "UserResource.raw".to_string(),
                text: marker::CHECK_GENERICS.to_string(),
            }]
        );
        let method = file.unit.types[0].methods().next().unwrap();
        let comments = method
            .modifiers
            .items
            .iter()
            .filter(|m| matches!(m, Modifier::Comment(_)))
            .count();
        assert_eq!(comments, 1);
    }

    #[test]
    fn test_member_type_keeps_new_annotation_qualified() {
        let view = ClassDecl::new("UserView")
            .with_field(
                FieldDecl::new("name", TypeRef::named("java.lang.String")).with_annotation(
                    Annotation::new(legacy::API_MODEL_PROPERTY)
                        .with_value(Value::string("Display name")),
                ),
            )
            .with_member(Member::Class(ClassDecl::new("Schema")));
        let mut file = SourceFile {
            unit: CompilationUnit {
                package: Some("com.acme".to_string()),
                imports: vec![Import::single(legacy::API_MODEL_PROPERTY)],
                types: vec![view],
            },
            types: Vec::new(),
        };

        let report = convert_file(&mut file, &ConverterConfig::default()).unwrap();

        assert!(report.imports.added.is_empty());
        assert!(file.unit.imports.is_empty());
        let java = crate::render::render_unit(&file.unit);
        assert!(java.contains(
            "@io.swagger.v3.oas.annotations.media.Schema(description = \"Display name\")"
        ));
        assert!(java.contains("class Schema {"));
    }

    #[test]
    fn test_unmapped_attribute_aborts_unit() {
        let method = MethodDecl::new("get", TypeRef::void()).with_annotation(
            Annotation::new(legacy::API_OPERATION).with("httpMethod", Value::string("GET")),
        );
        let mut file = SourceFile {
            unit: CompilationUnit {
                types: vec![ClassDecl::new("UserResource").with_method(method)],
                ..Default::default()
            },
            types: Vec::new(),
        };

        match convert_file(&mut file, &ConverterConfig::default()) {
            Err(Error::UnmappedAttribute {
                attribute,
                declaration,
                ..
            }) => {
                assert_eq!(attribute, "httpMethod");
                assert_eq!(declaration, "UserResource.get");
            }
            other => panic!("expected unmapped attribute, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_reports_declarations() {
        let file = resource();
        let found: Vec<_> = scan_unit(&file.unit)
            .into_iter()
            .map(|u| format!("{} @{}", u.declaration, u.annotation))
            .collect();

        assert_eq!(
            found,
            vec![
                "UserResource @Api",
                "UserResource.getUser @ApiOperation",
                "UserResource.getUser @ApiResponses",
                "UserResource.getUser(id) @ApiParam",
                "UserResource.UserView.name @ApiModelProperty",
            ]
        );
    }
}

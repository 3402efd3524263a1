use std::collections::BTreeMap;

use stockledger_core::{AppError, AppResult};
use stockledger_domain::{EntitySchema, schema_for_entity};

use crate::record_ports::{EqualityFilter, RecordQuery, RelationIncludes};

/// Resolves a public route segment to an internal entity logical name.
///
/// Unknown route names pass through unchanged (fallback = identity).
#[must_use]
pub fn convert_route_to_entity(route: &str) -> &str {
    match route {
        "goods-receipts" => "goods_receipt",
        "organizations" => "organization",
        "users" => "user",
        _ => route,
    }
}

/// A list request translated into a structured storage query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedListRequest {
    /// Entity logical name resolved from the route.
    pub entity_logical_name: String,
    /// Structured query for the storage engine.
    pub query: RecordQuery,
}

/// Translates an inbound filter/pagination request into a storage query.
///
/// Recognized keys are the schema's filterable fields plus `id` (translated
/// to equality filters), `limit`/`offset` (pagination), and `relations`
/// (comma-separated relation include hints). Unrecognized keys are ignored;
/// no implicit filters are injected — tenant scoping belongs to the
/// authorization gate.
pub fn translate_list_request(
    route_name: &str,
    params: &BTreeMap<String, String>,
) -> AppResult<TranslatedListRequest> {
    let entity_logical_name = convert_route_to_entity(route_name);
    let schema = schema_for_entity(entity_logical_name).ok_or_else(|| {
        AppError::Validation(format!(
            "entity '{entity_logical_name}' has no record query surface"
        ))
    })?;

    let mut query = RecordQuery::default();

    for (key, value) in params {
        match key.as_str() {
            "limit" => {
                query.limit = Some(parse_pagination_value(key, value)?);
            }
            "offset" => {
                query.offset = parse_pagination_value(key, value)?;
            }
            "relations" => {
                query.includes = translate_relation_includes(schema, value)?;
            }
            "id" => {
                query.filters.push(EqualityFilter {
                    field_logical_name: "id".to_owned(),
                    value: value.clone(),
                });
            }
            name => {
                let is_filterable = schema
                    .field(name)
                    .map(|field| field.is_filterable())
                    .unwrap_or(false);

                if is_filterable {
                    query.filters.push(EqualityFilter {
                        field_logical_name: name.to_owned(),
                        value: value.clone(),
                    });
                }
            }
        }
    }

    Ok(TranslatedListRequest {
        entity_logical_name: entity_logical_name.to_owned(),
        query,
    })
}

/// Translates a comma-separated relation hint into typed includes.
///
/// Relation names are enumerable, so unknown names are rejected rather than
/// ignored.
pub fn translate_relation_includes(
    schema: &EntitySchema,
    hint: &str,
) -> AppResult<RelationIncludes> {
    let mut includes = RelationIncludes::default();

    for name in hint.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let relation = schema.relation(name).ok_or_else(|| {
            AppError::Validation(format!(
                "unknown relation '{}' for entity '{}'",
                name,
                schema.entity_logical_name()
            ))
        })?;

        match relation.logical_name() {
            "user" => includes.user = true,
            "organization" => includes.organization = true,
            other => {
                return Err(AppError::Internal(format!(
                    "relation '{other}' has no include mapping"
                )));
            }
        }
    }

    Ok(includes)
}

fn parse_pagination_value(key: &str, value: &str) -> AppResult<usize> {
    value
        .parse::<usize>()
        .map_err(|error| AppError::Validation(format!("invalid {key} value '{value}': {error}")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use stockledger_domain::goods_receipt_schema;

    use super::{convert_route_to_entity, translate_list_request, translate_relation_includes};

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn known_routes_resolve_to_entity_names() {
        assert_eq!(convert_route_to_entity("goods-receipts"), "goods_receipt");
        assert_eq!(convert_route_to_entity("users"), "user");
        assert_eq!(convert_route_to_entity("organizations"), "organization");
    }

    #[test]
    fn unknown_routes_pass_through_unchanged() {
        assert_eq!(convert_route_to_entity("purchase-orders"), "purchase-orders");
    }

    #[test]
    fn recognized_filters_become_equality_conditions() {
        let translated = translate_list_request(
            "goods-receipts",
            &params(&[("user_id", "user-1"), ("id", "abc")]),
        );
        assert!(translated.is_ok());

        let translated = translated.unwrap_or_else(|_| unreachable!());
        assert_eq!(translated.entity_logical_name, "goods_receipt");
        assert_eq!(translated.query.filters.len(), 2);
    }

    #[test]
    fn unrecognized_filter_keys_are_ignored() {
        let translated = translate_list_request(
            "goods-receipts",
            &params(&[("po_value", "100"), ("warehouse", "north")]),
        );
        assert!(translated.is_ok());
        assert!(
            translated
                .unwrap_or_else(|_| unreachable!())
                .query
                .filters
                .is_empty()
        );
    }

    #[test]
    fn pagination_hints_pass_through() {
        let translated = translate_list_request(
            "goods-receipts",
            &params(&[("limit", "25"), ("offset", "50")]),
        );
        assert!(translated.is_ok());

        let query = translated.unwrap_or_else(|_| unreachable!()).query;
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.offset, 50);
    }

    #[test]
    fn absent_limit_stays_unbounded() {
        let translated = translate_list_request("goods-receipts", &BTreeMap::new());
        assert!(translated.is_ok());
        assert_eq!(translated.unwrap_or_else(|_| unreachable!()).query.limit, None);
    }

    #[test]
    fn malformed_pagination_value_is_rejected() {
        let translated =
            translate_list_request("goods-receipts", &params(&[("limit", "many")]));
        assert!(translated.is_err());
    }

    #[test]
    fn relation_hints_become_typed_includes() {
        let includes = translate_relation_includes(goods_receipt_schema(), "user,organization");
        assert!(includes.is_ok());

        let includes = includes.unwrap_or_default();
        assert!(includes.user);
        assert!(includes.organization);
    }

    #[test]
    fn unknown_relation_hint_is_rejected() {
        assert!(translate_relation_includes(goods_receipt_schema(), "warehouse").is_err());
    }

    #[test]
    fn routes_without_record_schema_are_rejected() {
        assert!(translate_list_request("users", &BTreeMap::new()).is_err());
    }
}

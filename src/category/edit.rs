//! Category update endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::lock_connection,
    category::{
        Category, CategoryId, CategoryName, CategoryUpdate, create::CategoryEndpointState,
        get_category, update_category,
    },
    json_body::JsonBody,
};

/// Handle a partial category update, e.g. `{"enabled": false}`.
///
/// Responds with the category as it is after the update.
pub async fn update_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Path(category_id): Path<CategoryId>,
    JsonBody(update): JsonBody<CategoryUpdate>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let mut category = get_category(category_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingCategory,
        error => error,
    })?;

    apply_update(&mut category, update)?;
    update_category(&category, &connection)
        .inspect_err(|error| tracing::error!("Could not update category {category_id}: {error}"))?;

    Ok(Json(category))
}

fn apply_update(category: &mut Category, update: CategoryUpdate) -> Result<(), Error> {
    if let Some(name) = update.name {
        category.name = CategoryName::new(&name)?;
    }

    if let Some(color) = update.color {
        category.color = color.trim().to_owned();
    }

    if let Some(enabled) = update.enabled {
        category.enabled = enabled;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        category::{Category, CategoryName, CategoryUpdate},
    };

    use super::apply_update;

    fn category() -> Category {
        Category {
            id: 1,
            name: CategoryName::new_unchecked("Food"),
            color: "#FF9800".to_owned(),
            enabled: true,
        }
    }

    #[test]
    fn only_given_fields_change() {
        let mut category = category();

        apply_update(
            &mut category,
            CategoryUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(category.name.as_ref(), "Food");
        assert_eq!(category.color, "#FF9800");
        assert!(!category.enabled);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut category = category();

        let result = apply_update(
            &mut category,
            CategoryUpdate {
                name: Some(" ".to_owned()),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::EmptyName));
    }
}

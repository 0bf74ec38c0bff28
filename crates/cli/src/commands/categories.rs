//! Category commands.

use std::fmt::Write as _;

use bazaar_admin::api::ApiClient;
use bazaar_core::{Category, catalog};

use super::{CliError, emit};

/// Print categories in display order.
///
/// # Errors
///
/// Returns an error if the backend request fails.
pub async fn list(client: &ApiClient) -> Result<(), CliError> {
    let categories = client.list_categories().await?;
    emit(&render(&categories));
    Ok(())
}

/// Move the category at `from` to `to` and save the full new order.
///
/// # Errors
///
/// Returns [`CliError::Reorder`] for an out-of-range position, or an API
/// error if the save fails.
pub async fn reorder(client: &ApiClient, from: usize, to: usize) -> Result<(), CliError> {
    let mut categories = Vec::clone(&*client.list_categories().await?);
    let payload = catalog::reorder(&mut categories, from, to)?;

    if from == to {
        tracing::info!(position = from, "Category already in place; nothing to save");
    } else {
        client.reorder_categories(&payload).await?;
        tracing::info!(from, to, "Category order saved");
    }

    emit(&render(&categories));
    Ok(())
}

/// One line per category: position, name, subcategory names and id.
fn render(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.\n".to_string();
    }

    let width = categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (position, category) in categories.iter().enumerate() {
        let subs = category
            .sub_categories
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{position:>3}  {name:<width$}  [{subs}]  {id}",
            name = category.name,
            id = category.id,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::{CategoryId, SubCategory};

    fn category(id: &str, name: &str, subs: &[&str]) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            image: String::new(),
            description: String::new(),
            sub_categories: subs
                .iter()
                .map(|s| SubCategory {
                    name: (*s).to_string(),
                    image: String::new(),
                    description: String::new(),
                })
                .collect(),
            order: 0,
        }
    }

    #[test]
    fn test_render_aligns_names() {
        let out = render(&[
            category("c1", "Women", &["Sarees", "Kurtis"]),
            category("c2", "Kids", &[]),
        ]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, vec![
            "  0  Women  [Sarees, Kurtis]  c1",
            "  1  Kids   []  c2",
        ]);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "No categories.\n");
    }
}

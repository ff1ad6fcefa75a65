//! Interactive menu module.
//!
//! This module owns all user interaction:
//! - The six-option main menu loop
//! - Guided prompts for adding, updating and deleting items
//! - Strict calorie input validation with re-prompting
//! - Disambiguation when several records share a name
//!
//! The menu is generic over its input reader, so tests can drive entire
//! sessions through an in-memory cursor. Everything it does on disk goes
//! through [`ItemStore`] and [`Catalog`], which re-derive their working set
//! from the tree on every call; the menu never caches records across
//! operations.

use crate::catalog::{Catalog, FIELD_CALORIES, Record};
use crate::output::OutputFormatter;
use crate::paths::Hierarchy;
use crate::stats;
use crate::store::ItemStore;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// The interactive menu over one catalog root.
pub struct Menu<R> {
    store: ItemStore,
    input: R,
}

impl<R: BufRead> Menu<R> {
    pub fn new(root: impl Into<PathBuf>, input: R) -> Self {
        Self {
            store: ItemStore::new(root),
            input,
        }
    }

    /// Runs the menu loop until the user quits or the input ends.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nutrikeep::cli::Menu;
    /// use std::io;
    ///
    /// let stdin = io::stdin();
    /// let mut menu = Menu::new("nutrition_catalog", stdin.lock());
    /// menu.run().expect("I/O failure");
    /// ```
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            OutputFormatter::header("--- MENU ---");
            println!("1) Add a new item");
            println!("2) List and filter items");
            println!("3) Update an item");
            println!("4) Delete an item");
            println!("5) Statistics and sorting");
            println!("6) Quit");
            let Some(choice) = self.read_line("Choose an option: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => self.add_item()?,
                "2" => self.list_items()?,
                "3" => self.update_item()?,
                "4" => self.delete_item()?,
                "5" => self.show_stats()?,
                "6" => {
                    OutputFormatter::info("Goodbye!");
                    break;
                }
                _ => OutputFormatter::warning("Unknown option, choose 1-6."),
            }
        }
        Ok(())
    }

    /// Prompts for the hierarchy labels and item attributes, then appends
    /// the new item. Empty labels or name abort the flow before anything
    /// touches the disk.
    fn add_item(&mut self) -> io::Result<()> {
        OutputFormatter::header("--- Add a New Item ---");
        let Some(category) = self.read_line("Category (e.g. Fruits): ")? else {
            return Ok(());
        };
        let Some(kind) = self.read_line("Type (e.g. Citrus): ")? else {
            return Ok(());
        };
        let Some(processing) = self.read_line("Processing (e.g. Fresh): ")? else {
            return Ok(());
        };

        let hierarchy = Hierarchy::from_labels(&category, &kind, &processing);
        if hierarchy.has_empty_segment() {
            OutputFormatter::warning("Category, type and processing are all required.");
            return Ok(());
        }

        let Some(name) = self.read_line("Item name: ")? else {
            return Ok(());
        };
        if name.is_empty() {
            OutputFormatter::warning("The item name cannot be empty.");
            return Ok(());
        }

        let Some(calories) = self.read_calories("Calories per 100 g: ")? else {
            return Ok(());
        };

        match self.store.append(&hierarchy, &name, calories) {
            Ok(record) => OutputFormatter::success(&format!(
                "Added '{}' ({} kcal/100g) under {}.",
                record.name(),
                calories,
                hierarchy,
            )),
            Err(e) => OutputFormatter::error(&e.to_string()),
        }
        Ok(())
    }

    fn list_items(&mut self) -> io::Result<()> {
        let catalog = self.load_catalog();
        if catalog.is_empty() {
            OutputFormatter::info("The catalog is empty.");
            return Ok(());
        }

        let Some(filter) = self.read_line("Filter by category (blank for all): ")? else {
            return Ok(());
        };
        if filter.is_empty() {
            OutputFormatter::record_table(&stats::sorted_by_name(&catalog));
        } else {
            let filtered = stats::filter_by_category(&catalog, &filter);
            if filtered.is_empty() {
                OutputFormatter::warning(&format!("No items in category '{}'.", filter));
            } else {
                OutputFormatter::record_table(&filtered);
            }
        }
        Ok(())
    }

    fn update_item(&mut self) -> io::Result<()> {
        OutputFormatter::header("--- Update an Item ---");
        let Some(name) = self.read_line("Name of the item to update: ")? else {
            return Ok(());
        };
        if name.is_empty() {
            OutputFormatter::warning("No name entered, returning to the menu.");
            return Ok(());
        }

        let catalog = self.load_catalog();
        if catalog.is_empty() {
            OutputFormatter::info("The catalog is empty, nothing to update.");
            return Ok(());
        }
        let Some(target) = self.select_target(&catalog, &name)? else {
            return Ok(());
        };

        let Some(new_name) = self.read_required("New name: ")? else {
            return Ok(());
        };
        let Some(new_calories) = self.read_calories("New calories per 100 g: ")? else {
            return Ok(());
        };

        match self.store.update(target, &new_name, new_calories) {
            Ok(0) => {
                OutputFormatter::warning("The item was already gone; nothing was changed.")
            }
            Ok(_) => OutputFormatter::success(&format!(
                "Updated '{}' to '{}' ({} kcal/100g).",
                target.name(),
                new_name,
                new_calories,
            )),
            Err(e) => OutputFormatter::error(&e.to_string()),
        }
        Ok(())
    }

    fn delete_item(&mut self) -> io::Result<()> {
        OutputFormatter::header("--- Delete an Item ---");
        let Some(name) = self.read_line("Name of the item to delete: ")? else {
            return Ok(());
        };
        if name.is_empty() {
            OutputFormatter::warning("No name entered, returning to the menu.");
            return Ok(());
        }

        let catalog = self.load_catalog();
        if catalog.is_empty() {
            OutputFormatter::info("The catalog is empty, nothing to delete.");
            return Ok(());
        }
        let Some(target) = self.select_target(&catalog, &name)? else {
            return Ok(());
        };

        let prompt = format!(
            "Delete '{}' [{} kcal/100g] from {}? [y/N]: ",
            target.name(),
            target.get(FIELD_CALORIES).unwrap_or("-"),
            target
                .hierarchy()
                .map(|h| h.to_string())
                .unwrap_or_else(|| stats::UNCLASSIFIED.to_string()),
        );
        let Some(answer) = self.read_line(&prompt)? else {
            return Ok(());
        };
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            OutputFormatter::info("Cancelled.");
            return Ok(());
        }

        match self.store.delete(target) {
            Ok(0) => {
                OutputFormatter::warning("The item was already gone; nothing was changed.")
            }
            Ok(_) => OutputFormatter::success(&format!("Deleted '{}'.", target.name())),
            Err(e) => OutputFormatter::error(&e.to_string()),
        }
        Ok(())
    }

    fn show_stats(&mut self) -> io::Result<()> {
        let catalog = self.load_catalog();
        if catalog.is_empty() {
            OutputFormatter::info("The catalog is empty.");
            return Ok(());
        }

        OutputFormatter::header("STATISTICS");
        match stats::calorie_stats(&catalog) {
            Some(s) => {
                println!("Items with calorie data: {}", s.counted);
                if s.skipped > 0 {
                    OutputFormatter::warning(&format!(
                        "{} item(s) have no usable calorie value.",
                        s.skipped
                    ));
                }
                println!("Min:  {:.1} kcal/100g", s.min);
                println!("Max:  {:.1} kcal/100g", s.max);
                println!("Mean: {:.1} kcal/100g", s.mean);
            }
            None => OutputFormatter::warning("No item has a usable calorie value."),
        }

        OutputFormatter::category_table(&stats::count_by_category(&catalog), catalog.len());

        let Some(order) =
            self.read_line("Sort listing by [n]ame, [c]alories, or blank to skip: ")?
        else {
            return Ok(());
        };
        match order.to_lowercase().as_str() {
            "n" | "name" => OutputFormatter::record_table(&stats::sorted_by_name(&catalog)),
            "c" | "calories" => {
                OutputFormatter::record_table(&stats::sorted_by_calories(&catalog))
            }
            "" => {}
            _ => OutputFormatter::warning("Unknown sort key, skipping."),
        }
        Ok(())
    }

    /// Rebuilds the catalog from disk, reporting any leaf files that had to
    /// be skipped.
    fn load_catalog(&self) -> Catalog {
        let spinner = OutputFormatter::scan_spinner("Scanning catalog tree...");
        let catalog = Catalog::load(self.store.root());
        spinner.finish_and_clear();
        for (path, reason) in catalog.skipped_files() {
            OutputFormatter::warning(&format!("Skipped {}: {}", path.display(), reason));
        }
        catalog
    }

    /// Finds the record the user means by `name`.
    ///
    /// A unique match is returned directly. Multiple matches show a
    /// numbered candidate list; an out-of-range or non-numeric selection is
    /// re-prompted, and 0 cancels the whole operation as a no-op.
    fn select_target<'a>(
        &mut self,
        catalog: &'a Catalog,
        name: &str,
    ) -> io::Result<Option<&'a Record>> {
        let matches = catalog.find_by_name(name);
        if matches.is_empty() {
            OutputFormatter::warning(&format!("No item named '{}' was found.", name));
            return Ok(None);
        }
        if matches.len() == 1 {
            return Ok(Some(matches[0]));
        }

        OutputFormatter::warning(&format!("{} items share that name:", matches.len()));
        OutputFormatter::candidate_table(&matches);
        loop {
            let Some(line) = self.read_line("Select an item (0 to cancel): ")? else {
                return Ok(None);
            };
            match line.parse::<usize>() {
                Ok(0) => {
                    OutputFormatter::info("Cancelled.");
                    return Ok(None);
                }
                Ok(n) if n <= matches.len() => return Ok(Some(matches[n - 1])),
                _ => OutputFormatter::warning("Enter a number from the list."),
            }
        }
    }

    /// Reads a calorie value, re-prompting until it is a number greater
    /// than zero.
    fn read_calories(&mut self, prompt: &str) -> io::Result<Option<f64>> {
        loop {
            let Some(value) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if value.is_empty() {
                OutputFormatter::warning("The value cannot be empty.");
                continue;
            }
            match value.parse::<f64>() {
                Ok(calories) if calories > 0.0 => return Ok(Some(calories)),
                Ok(_) => {
                    OutputFormatter::warning("Calories must be a number greater than zero.")
                }
                Err(_) => OutputFormatter::warning("Enter a numeric value."),
            }
        }
    }

    fn read_required(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            let Some(value) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if value.is_empty() {
                OutputFormatter::warning("The value cannot be empty.");
                continue;
            }
            return Ok(Some(value));
        }
    }

    /// Prompts and reads one trimmed line; `None` means the input ended.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

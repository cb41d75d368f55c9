use crate::{
    data::{Error, Record, SearchField, YearMonth, HEADER},
    store::Store,
    write::{resolve_amount, resolve_date},
};
use chrono::Local;
use std::io::{BufRead, Write};

/// The interactive menu. It only collects input, re-prompts on validation
/// errors and renders results; all data handling goes through `Store`.
pub(crate) struct Shell<R, W> {
    store: Store,
    currency: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: Store, currency: &str, input: R, output: W) -> Self {
        Self {
            store,
            currency: currency.to_owned(),
            input,
            output,
        }
    }

    /// Runs the menu until the user picks exit or input runs out.
    pub fn run(&mut self) -> Result<(), Error> {
        if self.store.ensure_exists()? {
            writeln!(
                self.output,
                "'{}' created successfully.",
                self.store.path().display()
            )?;
        }
        loop {
            writeln!(self.output, "\n===== Expense Tracker Menu =====")?;
            writeln!(self.output, "1. Add a new expense")?;
            writeln!(self.output, "2. View all expenses")?;
            writeln!(self.output, "3. Search for expenses")?;
            writeln!(self.output, "4. Calculate monthly total")?;
            writeln!(self.output, "5. Exit")?;
            let Some(choice) = self.prompt("Enter your choice (1-5): ")? else {
                break;
            };
            match choice.trim() {
                "1" => self.add_expense()?,
                "2" => self.view_expenses()?,
                "3" => self.search_expenses()?,
                "4" => self.monthly_total()?,
                "5" => break,
                _ => writeln!(
                    self.output,
                    "Invalid choice. Please enter a number between 1 and 5."
                )?,
            }
        }
        writeln!(self.output, "Exiting Expense Tracker. Goodbye!")?;
        Ok(())
    }

    fn add_expense(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- Add a New Expense ---")?;
        let today = Local::now().date_naive();
        let date = loop {
            let Some(input) =
                self.prompt("Enter the date (YYYY-MM-DD), or leave blank for today: ")?
            else {
                return Ok(());
            };
            match resolve_date(&input, today) {
                Ok(_) => break input,
                Err(e) => writeln!(self.output, "{e}")?,
            }
        };
        let amount = loop {
            let Some(input) = self.prompt("Enter the amount: ")? else {
                return Ok(());
            };
            match resolve_amount(&input) {
                Ok(_) => break input,
                Err(e) => writeln!(self.output, "{e}")?,
            }
        };
        let Some(category) = self.prompt("Enter the category (e.g., Food, Transport, Rent): ")?
        else {
            return Ok(());
        };
        self.store.add_record(today, &date, &amount, &category)?;
        writeln!(self.output, "Expense added successfully!")?;
        Ok(())
    }

    fn view_expenses(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- All Expenses ---")?;
        match self.store.list_all() {
            Ok(records) => self.render(&records),
            Err(Error::EmptyStore) => {
                writeln!(self.output, "No expenses recorded yet.")?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn search_expenses(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- Search Expenses ---")?;
        let Some(input) = self.prompt("Search by (date/category): ")? else {
            return Ok(());
        };
        let field = match input.parse::<SearchField>() {
            Ok(field) => field,
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(());
            }
        };
        let Some(term) = self.prompt(&format!("Enter the {field} to search for: "))? else {
            return Ok(());
        };
        match self.store.search(field, &term) {
            Ok(matches) if matches.is_empty() => {
                writeln!(self.output, "No expenses found for '{term}'.")?;
                Ok(())
            }
            Ok(matches) => {
                writeln!(self.output, "\n--- Search Results ---")?;
                self.render(&matches)
            }
            Err(Error::EmptyStore) => {
                writeln!(self.output, "No expenses recorded to search.")?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn monthly_total(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- Calculate Monthly Total ---")?;
        let month = loop {
            let Some(input) = self.prompt("Enter the month and year (YYYY-MM): ")? else {
                return Ok(());
            };
            match input.parse::<YearMonth>() {
                Ok(month) => break month,
                Err(e) => writeln!(self.output, "{e}")?,
            }
        };
        match self.store.monthly_total(month) {
            Ok(total) => writeln!(
                self.output,
                "\nTotal expenses for {}: {}{:.2}",
                total.month, self.currency, total.total
            )?,
            Err(Error::EmptyStore) => {
                writeln!(self.output, "No expenses recorded for this period.")?
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn render(&mut self, records: &[Record]) -> Result<(), Error> {
        let [date, amount, category] = HEADER;
        writeln!(self.output, "{date:<12} | {amount:<10} | {category:<20}")?;
        writeln!(self.output, "{}", "-".repeat(45))?;
        for record in records {
            writeln!(
                self.output,
                "{:<12} | {:<10} | {:<20}",
                record.date.to_string(),
                record.amount.to_string(),
                record.category
            )?;
        }
        Ok(())
    }

    /// Prints `text` and reads one line without its terminator. `None` on end
    /// of input. Other whitespace is kept: categories are taken verbatim.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, Error> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use crate::store::Store;
    use chrono::Local;
    use std::fs;
    use tempfile::TempDir;

    use super::Shell;

    /// Runs the shell over `script` against a scratch store and returns what it
    /// printed along with the store.
    fn run(dir: &TempDir, script: &str) -> (String, Store) {
        let store = Store::new(dir.path().join("expenses.csv"));
        let mut out = Vec::new();
        Shell::new(store.clone(), "₹", script.as_bytes(), &mut out)
            .run()
            .unwrap();
        (String::from_utf8(out).unwrap(), store)
    }

    #[test]
    fn creates_store_and_exits() {
        let dir = tempfile::tempdir().unwrap();
        let (out, store) = run(&dir, "5\n");
        assert!(out.contains("created successfully"));
        assert!(out.ends_with("Exiting Expense Tracker. Goodbye!\n"));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "date,amount,category\n"
        );
        let (out, _) = run(&dir, "5\n");
        assert!(!out.contains("created successfully"));
    }

    #[test]
    fn end_of_input_exits() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&dir, "");
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn invalid_choice() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&dir, "9\n5\n");
        assert!(out.contains("Invalid choice. Please enter a number between 1 and 5."));
    }

    #[test]
    fn add_reprompts_until_valid() {
        let dir = tempfile::tempdir().unwrap();
        let script = "1\n2024-13-40\n2024-03-15\nabc\n-5\n42.50\nFood\n5\n";
        let (out, store) = run(&dir, script);
        assert!(out.contains("Invalid date '2024-13-40'"));
        assert!(out.contains("Invalid amount 'abc'"));
        assert!(out.contains("Amount must be a positive number"));
        assert!(out.contains("Expense added successfully!"));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "date,amount,category\n2024-03-15,42.50,Food\n"
        );
    }

    #[test]
    fn blank_date_is_local_today() {
        let dir = tempfile::tempdir().unwrap();
        let before = Local::now().date_naive();
        let (_, store) = run(&dir, "1\n\n4.20\nCoffee\n5\n");
        let after = Local::now().date_naive();
        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].date == before || records[0].date == after);
        assert_eq!(records[0].category, "Coffee");
    }

    #[test]
    fn view_empty_and_filled() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&dir, "2\n5\n");
        assert!(out.contains("No expenses recorded yet."));
        let (out, _) = run(&dir, "1\n2024-03-15\n42.50\nFood\n2\n5\n");
        assert!(out.contains("date         | amount     | category"));
        assert!(out.contains(&"-".repeat(45)));
        assert!(out.contains("2024-03-15   | 42.50      | Food"));
    }

    #[test]
    fn search_messages() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&dir, "3\ncategory\nfood\n5\n");
        assert!(out.contains("No expenses recorded to search."));
        let (out, _) = run(&dir, "3\namount\n5\n");
        assert!(out.contains("Invalid search field 'amount'"));
        let script = "1\n2024-03-15\n3\n Transport \n3\ncategory\nrent\n3\nCategory\ntransport\n5\n";
        let (out, _) = run(&dir, script);
        assert!(out.contains("No expenses found for 'rent'."));
        assert!(out.contains("--- Search Results ---"));
        assert!(out.contains("2024-03-15   | 3          |  Transport "));
    }

    #[test]
    fn monthly_total() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&dir, "4\n2024-03\n5\n");
        assert!(out.contains("Total expenses for March 2024: ₹0.00"));
        let script = "1\n2024-03-01\n10.00\nA\n1\n2024-03-31\n5.5\nB\n4\n2024/03\n2024-03\n5\n";
        let (out, _) = run(&dir, script);
        assert!(out.contains("Invalid month '2024/03'"));
        assert!(out.contains("Total expenses for March 2024: ₹15.50"));
    }
}

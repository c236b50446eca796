//! Interactive text menu driving the catalog.
//!
//! Input is parsed and validated here: menu choices and member ids must be
//! numbers, required fields must not be blank. Invalid input is reported and
//! asked again, so the catalog only ever sees well-typed arguments. Every
//! catalog outcome, success or failure, is rendered as text.

use std::io::{self, BufRead, Write};

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, book::BookSelector, loan::SearchHit, member::Member},
    services::Catalog,
};

const RULE: &str = "--------------------------------------------------";

const OPTIONS: &[&str] = &[
    "1. Add a book",
    "2. List all books",
    "3. List available books",
    "4. List borrowed books",
    "5. Borrow a book",
    "6. Return a book",
    "7. Remove a book",
    "8. Search by title or author",
    "9. Register a member",
    "10. Show a member",
    "11. List members",
    "12. Check overdue penalties",
    "13. Clear a member's penalties",
    "0. Quit",
];

enum Step {
    Continue,
    Exit,
}

pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user quits or input ends
    pub fn run(&mut self, catalog: &mut Catalog) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "Options:")?;
            for option in OPTIONS {
                writeln!(self.output, "{}", option)?;
            }

            let Some(choice) = self.prompt("Choose an option")? else {
                break;
            };
            if let Step::Exit = self.dispatch(catalog, choice.trim())? {
                break;
            }
        }
        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    fn dispatch(&mut self, catalog: &mut Catalog, choice: &str) -> io::Result<Step> {
        match choice {
            "1" => self.add_book(catalog),
            "2" => self.list_books(catalog, None),
            "3" => self.list_books(catalog, Some(true)),
            "4" => self.list_books(catalog, Some(false)),
            "5" => self.borrow(catalog),
            "6" => self.return_book(catalog),
            "7" => self.remove_book(catalog),
            "8" => self.search(catalog),
            "9" => self.register_member(catalog),
            "10" => self.show_member(catalog),
            "11" => self.list_members(catalog),
            "12" => self.check_penalties(catalog),
            "13" => self.clear_penalties(catalog),
            "0" | "q" | "quit" => Ok(Step::Exit),
            _ => {
                writeln!(self.output, "Invalid option, please try again.")?;
                Ok(Step::Continue)
            }
        }
    }

    fn add_book(&mut self, catalog: &mut Catalog) -> io::Result<Step> {
        let Some(title) = self.prompt_required("Title")? else {
            return Ok(Step::Exit);
        };
        let Some(author) = self.prompt_required("Author")? else {
            return Ok(Step::Exit);
        };
        match catalog.add_book(&title, &author) {
            Ok(book) => writeln!(self.output, "Added '{}' by {}.", book.title, book.author)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    fn list_books(&mut self, catalog: &Catalog, available: Option<bool>) -> io::Result<Step> {
        if catalog.book_count() == 0 {
            writeln!(self.output, "The library is empty.")?;
            return Ok(Step::Continue);
        }

        writeln!(self.output, "Books:")?;
        writeln!(self.output, "{}", RULE)?;
        let mut shown = 0;
        for book in catalog.list_books(available) {
            let borrower = book
                .borrower_id
                .and_then(|id| catalog.get_member(id).ok())
                .map(|m| m.name.as_str());
            render_book(&mut self.output, book, borrower)?;
            shown += 1;
        }
        if shown == 0 {
            writeln!(self.output, "No matching books.")?;
        }
        Ok(Step::Continue)
    }

    fn borrow(&mut self, catalog: &mut Catalog) -> io::Result<Step> {
        let Some(member_id) = self.prompt_id("Member id")? else {
            return Ok(Step::Exit);
        };
        let Some(title) = self.prompt_required("Title to borrow")? else {
            return Ok(Step::Exit);
        };
        match self.with_selector(title, |selector| catalog.borrow(selector, member_id))? {
            None => return Ok(Step::Exit),
            Some(Ok(loan)) => writeln!(
                self.output,
                "'{}' borrowed, due back {}.",
                loan.title,
                loan.due_date.format("%Y-%m-%d")
            )?,
            Some(Err(e)) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    fn return_book(&mut self, catalog: &mut Catalog) -> io::Result<Step> {
        let Some(member_id) = self.prompt_id("Member id")? else {
            return Ok(Step::Exit);
        };
        let Some(title) = self.prompt_required("Title to return")? else {
            return Ok(Step::Exit);
        };
        match self.with_selector(title, |selector| catalog.return_book(selector, member_id))? {
            None => return Ok(Step::Exit),
            Some(Ok(book)) => writeln!(self.output, "'{}' returned.", book.title)?,
            Some(Err(e)) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    fn remove_book(&mut self, catalog: &mut Catalog) -> io::Result<Step> {
        let Some(title) = self.prompt_required("Title to remove")? else {
            return Ok(Step::Exit);
        };
        match self.with_selector(title, |selector| catalog.remove_book(selector))? {
            None => return Ok(Step::Exit),
            Some(Ok(book)) => writeln!(self.output, "Removed '{}' by {}.", book.title, book.author)?,
            Some(Err(e)) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    fn search(&mut self, catalog: &Catalog) -> io::Result<Step> {
        let Some(query) = self.prompt_required("Title or author")? else {
            return Ok(Step::Exit);
        };
        let hits = catalog.search(&query);
        if hits.is_empty() {
            writeln!(self.output, "No book found.")?;
            return Ok(Step::Continue);
        }

        writeln!(self.output, "Search results:")?;
        writeln!(self.output, "{}", RULE)?;
        for hit in &hits {
            render_hit(&mut self.output, hit)?;
        }
        Ok(Step::Continue)
    }

    fn register_member(&mut self, catalog: &mut Catalog) -> io::Result<Step> {
        let Some(name) = self.prompt_required("Member name")? else {
            return Ok(Step::Exit);
        };
        match catalog.register_member(&name) {
            Ok(member) => writeln!(self.output, "Registered {} with id {}.", member.name, member.id)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    fn show_member(&mut self, catalog: &Catalog) -> io::Result<Step> {
        let Some(id) = self.prompt_id("Member id")? else {
            return Ok(Step::Exit);
        };
        let member = match catalog.get_member(id) {
            Ok(member) => member,
            Err(e) => {
                self.report(&e)?;
                return Ok(Step::Continue);
            }
        };

        render_member(&mut self.output, member, catalog.rules().max_loans)?;
        if !catalog.can_borrow(member) {
            writeln!(self.output, "  Cannot borrow at the moment.")?;
        }
        match catalog.member_loans(id) {
            Ok(loans) => {
                for loan in loans {
                    writeln!(
                        self.output,
                        "  - '{}' by {}, due {}{}",
                        loan.title,
                        loan.author,
                        loan.due_date.format("%Y-%m-%d"),
                        if loan.is_overdue { " (overdue)" } else { "" }
                    )?;
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    fn list_members(&mut self, catalog: &Catalog) -> io::Result<Step> {
        let max_loans = catalog.rules().max_loans;
        let mut shown = 0;
        for member in catalog.list_members() {
            render_member(&mut self.output, member, max_loans)?;
            shown += 1;
        }
        if shown == 0 {
            writeln!(self.output, "No members registered.")?;
        }
        Ok(Step::Continue)
    }

    fn check_penalties(&mut self, catalog: &mut Catalog) -> io::Result<Step> {
        match catalog.check_penalties() {
            Ok(applied) if applied.is_empty() => writeln!(self.output, "No overdue loans.")?,
            Ok(applied) => {
                for penalty in applied {
                    writeln!(
                        self.output,
                        "Member {} penalized for '{}' (now {}).",
                        penalty.member_id, penalty.title, penalty.penalty_count
                    )?;
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    fn clear_penalties(&mut self, catalog: &mut Catalog) -> io::Result<Step> {
        let Some(id) = self.prompt_id("Member id")? else {
            return Ok(Step::Exit);
        };
        match catalog.clear_penalties(id) {
            Ok(0) => writeln!(self.output, "Member {} had no penalties.", id)?,
            Ok(cleared) => writeln!(self.output, "Cleared {} penalties for member {}.", cleared, id)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Step::Continue)
    }

    /// Run `op` on the book titled `title`, asking for the author whenever
    /// the title is ambiguous. `None` when input ended.
    fn with_selector<T>(
        &mut self,
        title: String,
        mut op: impl FnMut(BookSelector) -> AppResult<T>,
    ) -> io::Result<Option<AppResult<T>>> {
        let mut selector = BookSelector::title(title);
        loop {
            match op(selector.clone()) {
                Err(e @ AppError::AmbiguousTitle { .. }) => {
                    writeln!(self.output, "{}", e)?;
                    let Some(author) = self.prompt_required("Author")? else {
                        return Ok(None);
                    };
                    selector = BookSelector::with_author(selector.title, author);
                }
                outcome => return Ok(Some(outcome)),
            }
        }
    }

    fn report(&mut self, err: &AppError) -> io::Result<()> {
        tracing::debug!("Menu: operation rejected ({:?}): {}", err.kind(), err);
        writeln!(self.output, "{}", err)
    }

    /// Read one line; `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    fn prompt_required(&mut self, label: &str) -> io::Result<Option<String>> {
        loop {
            match self.prompt(label)? {
                None => return Ok(None),
                Some(value) if value.trim().is_empty() => {
                    writeln!(self.output, "{} must not be empty.", label)?;
                }
                Some(value) => return Ok(Some(value.trim().to_string())),
            }
        }
    }

    fn prompt_id(&mut self, label: &str) -> io::Result<Option<u32>> {
        loop {
            let Some(value) = self.prompt(label)? else {
                return Ok(None);
            };
            match value.trim().parse::<u32>() {
                Ok(id) => return Ok(Some(id)),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }
}

fn render_book<W: Write>(out: &mut W, book: &Book, borrower: Option<&str>) -> io::Result<()> {
    writeln!(out, "Title: {}", book.title)?;
    writeln!(out, "Author: {}", book.author)?;
    match (book.borrower_id, book.borrow_date) {
        (Some(id), Some(date)) => writeln!(
            out,
            "Status: borrowed by {} (#{}) on {}",
            borrower.unwrap_or("unknown member"),
            id,
            date.format("%Y-%m-%d")
        )?,
        _ => writeln!(out, "Status: available")?,
    }
    writeln!(out, "{}", RULE)
}

fn render_hit<W: Write>(out: &mut W, hit: &SearchHit) -> io::Result<()> {
    writeln!(out, "Title: {}", hit.title)?;
    writeln!(out, "Author: {}", hit.author)?;
    match &hit.borrower {
        Some(borrower) => writeln!(
            out,
            "Status: borrowed by {} (#{}){}",
            borrower.name.as_deref().unwrap_or("unknown member"),
            borrower.id,
            if hit.is_overdue { ", overdue" } else { "" }
        )?,
        None => writeln!(out, "Status: available")?,
    }
    writeln!(out, "{}", RULE)
}

fn render_member<W: Write>(out: &mut W, member: &Member, max_loans: usize) -> io::Result<()> {
    writeln!(
        out,
        "#{} {}: {}/{} loans, {} penalties",
        member.id,
        member.name,
        member.loan_count(),
        max_loans,
        member.penalty_count
    )
}

//! The interactive menu: a small state machine over user commands.

use crate::console::{Console, Tone};
use crate::storage::{StorageError, TaskStorage};
use crate::task::DUE_DATE_EXAMPLE;
use crate::task_store::TaskStore;
use log::{debug, info};
use std::{io, time::Duration};

/// Number of most recent tasks shown on the main menu.
const RECENT_TASKS: usize = 5;

const SHORT_PAUSE: Duration = Duration::from_millis(400);
const PAUSE: Duration = Duration::from_millis(700);
const LONG_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    AddingTask,
    ListingTasks,
    DeletingTask,
    Quitting,
}

/// Maps a main-menu command to the next screen, or `None` if the command is
/// not accepted. Delete is only accepted while there are tasks.
pub fn main_menu_transition(input: &str, has_tasks: bool) -> Option<Screen> {
    match input.trim().to_ascii_uppercase().as_str() {
        "A" => Some(Screen::AddingTask),
        "V" => Some(Screen::ListingTasks),
        "D" if has_tasks => Some(Screen::DeletingTask),
        "Q" => Some(Screen::Quitting),
        _ => None,
    }
}

pub struct Menu<S, C> {
    store: TaskStore<S>,
    console: C,
}

impl<S: TaskStorage, C: Console> Menu<S, C> {
    pub fn new(store: TaskStore<S>, console: C) -> Self {
        Self { store, console }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_parts(self) -> (TaskStore<S>, C) {
        (self.store, self.console)
    }

    /// Runs until the user quits or input is closed.
    ///
    /// # Errors
    ///
    /// Only terminal I/O errors end the loop early.
    pub fn run(&mut self) -> io::Result<()> {
        let mut screen = Screen::MainMenu;
        while screen != Screen::Quitting {
            screen = self.step(screen)?;
        }
        self.farewell()
    }

    /// Runs one screen and returns the screen to show next.
    pub fn step(&mut self, screen: Screen) -> io::Result<Screen> {
        match screen {
            Screen::MainMenu => self.main_menu(),
            Screen::AddingTask => self.add_tasks(),
            Screen::ListingTasks => self.list_tasks(),
            Screen::DeletingTask => self.delete_tasks(),
            Screen::Quitting => Ok(Screen::Quitting),
        }
    }

    fn main_menu(&mut self) -> io::Result<Screen> {
        self.console.clear()?;
        self.console.println(Tone::Heading, "---Task Manager---\n")?;

        let tasks = self.store.list();
        if tasks.is_empty() {
            self.console.println(Tone::Error, "No Tasks Yet!\n")?;
        } else {
            let start = tasks.len().saturating_sub(RECENT_TASKS);
            for task in &tasks[start..] {
                self.console.println(Tone::Listing, &task.menu_line())?;
            }
        }
        self.console.println(Tone::Success, "------------------")?;
        self.console.println(Tone::Success, "Add a New Task -> Press 'A'")?;
        self.console.println(Tone::Success, "View all Tasks -> Press 'V'")?;
        if !self.store.is_empty() {
            self.console.println(Tone::Success, "Delete a Task -> Press 'D'")?;
        }
        self.console.println(Tone::Success, "Quit the application -> Press 'Q'\n")?;

        let Some(input) = self.prompt("Choose an option: ")? else {
            return Ok(Screen::Quitting);
        };
        match main_menu_transition(&input, !self.store.is_empty()) {
            Some(next) => Ok(next),
            None => {
                debug!("unrecognized menu command {input:?}");
                self.wrong_input()?;
                Ok(Screen::MainMenu)
            }
        }
    }

    fn add_tasks(&mut self) -> io::Result<Screen> {
        loop {
            self.console.clear()?;
            self.console
                .println(Tone::Heading, "---Task Manager | Add a Task---\n")?;

            let Some(title) = self.prompt("Add your Task Title: ")? else {
                return Ok(Screen::Quitting);
            };
            let Some(assigned_to) = self.prompt("Add your Task Assigned To: ")? else {
                return Ok(Screen::Quitting);
            };
            let due_prompt = format!("When is the Due Date (Format: {DUE_DATE_EXAMPLE}): ");
            let Some(due_date) = self.prompt(&due_prompt)? else {
                return Ok(Screen::Quitting);
            };

            let (task, flush) = match self.store.create(&title, &assigned_to, &due_date) {
                Ok(saved) => saved.into_parts(),
                Err(err) => {
                    debug!("rejected new task: {err}");
                    self.console
                        .println(Tone::Error, &format!("{err}. Try again."))?;
                    self.console.pause(PAUSE);
                    continue;
                }
            };
            self.console
                .println(Tone::Success, "\nTask added successfully!\n")?;
            self.console.println(Tone::Listing, &task.details())?;
            self.report_flush(flush)?;

            match self.confirm_another()? {
                Some(true) => continue,
                Some(false) => return Ok(Screen::MainMenu),
                None => return Ok(Screen::Quitting),
            }
        }
    }

    fn confirm_another(&mut self) -> io::Result<Option<bool>> {
        loop {
            let Some(answer) = self.prompt("\nDo you want to add another task? (Y/N): ")? else {
                return Ok(None);
            };
            match answer.trim().to_ascii_uppercase().as_str() {
                "Y" => return Ok(Some(true)),
                "N" => return Ok(Some(false)),
                _ => self
                    .console
                    .println(Tone::Error, "Respond with Y or N only!")?,
            }
        }
    }

    fn list_tasks(&mut self) -> io::Result<Screen> {
        self.console.clear()?;
        self.console
            .println(Tone::Heading, "---Task Manager | All Tasks---\n")?;
        self.render_all()?;
        self.console.println(
            Tone::Success,
            "Press Enter to return to the Main Screen..\n",
        )?;
        match self.console.read_line()? {
            Some(_) => Ok(Screen::MainMenu),
            None => Ok(Screen::Quitting),
        }
    }

    fn delete_tasks(&mut self) -> io::Result<Screen> {
        loop {
            self.console.clear()?;
            self.console
                .println(Tone::Heading, "---Task Manager | Delete a Task---\n")?;
            self.render_all()?;

            let Some(input) = self.prompt("Enter the ID to delete (or 'Q' to go back): ")? else {
                return Ok(Screen::Quitting);
            };
            let input = input.trim();
            if input.eq_ignore_ascii_case("q") {
                return Ok(Screen::MainMenu);
            }

            let Ok(id) = input.parse::<u32>() else {
                self.console.println(Tone::Error, "Invalid! Enter a number.")?;
                self.console.pause(LONG_PAUSE);
                continue;
            };

            match self.store.delete_by_id(id) {
                Ok(saved) => {
                    let (task, flush) = saved.into_parts();
                    self.console
                        .println(Tone::Success, &format!("\nTask {} deleted!", task.id()))?;
                    self.report_flush(flush)?;
                    self.console.pause(LONG_PAUSE);
                }
                Err(err) => {
                    debug!("delete failed: {err}");
                    self.console.println(Tone::Error, &format!("{err}!"))?;
                    self.console.pause(LONG_PAUSE);
                    continue;
                }
            }

            if self.store.is_empty() {
                return Ok(Screen::MainMenu);
            }
        }
    }

    fn render_all(&mut self) -> io::Result<()> {
        if self.store.is_empty() {
            return self.console.println(Tone::Error, "No Tasks Yet!\n");
        }
        for task in self.store.list() {
            self.console.println(Tone::Listing, &format!("{task}\n"))?;
        }
        Ok(())
    }

    fn report_flush(&mut self, flush: Result<(), StorageError>) -> io::Result<()> {
        match flush {
            Ok(()) => Ok(()),
            Err(err) => self.console.println(
                Tone::Error,
                &format!("Warning: the change was not saved to disk ({err})"),
            ),
        }
    }

    fn wrong_input(&mut self) -> io::Result<()> {
        for dots in 1..=3 {
            self.console.clear()?;
            self.console
                .println(Tone::Error, &format!("Wrong Input{}", ".".repeat(dots)))?;
            self.console.pause(SHORT_PAUSE);
        }
        Ok(())
    }

    fn farewell(&mut self) -> io::Result<()> {
        for (tone, text) in [
            (Tone::Prompt, "Good bye!"),
            (Tone::Heading, "Good bye!!"),
            (Tone::Error, "Good bye!!!"),
        ] {
            self.console.clear()?;
            self.console.println(tone, text)?;
            self.console.pause(PAUSE);
        }
        Ok(())
    }

    /// Prints `text` and reads the answer; `None` once input is closed.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.console.print(Tone::Prompt, text)?;
        let line = self.console.read_line()?;
        if line.is_none() {
            info!("input closed, leaving the menu");
        }
        Ok(line)
    }
}

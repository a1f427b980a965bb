//! Drives the customer creation wizard through an [`Interaction`].
//!
//! Each step screen owns a local form seeded from the draft. Only the
//! wizard's `advance`, `back`, `cancel` and `submit` change where the flow is.

use crate::domain::{
    Choice, ContactType, Country, Customer, Gender, IdentityProofType, Language,
};
use crate::screens::{render_customer, DisplayMode};
use crate::wizard::{
    AddressForm, ContactForm, FieldErrors, IdentityForm, PersonalForm, StepForm,
    SubmissionReceipt, WizardStep,
};

use super::core::{CommandError, CommandResult, ShellContext};
use super::interaction::Interaction;
use super::output;

const STEP_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAction {
    Next,
    AddEntry,
    RemoveEntry,
    Back,
    Cancel,
}

/// Runs the wizard from the first step until it is cancelled or finished.
pub fn run(ctx: &mut ShellContext, io: &mut dyn Interaction) -> CommandResult {
    ctx.wizard.begin();
    loop {
        ctx.flush_notifications();
        let step = ctx.wizard.step().clone();
        match step {
            WizardStep::Personal => personal_step(ctx, io)?,
            WizardStep::Address => address_step(ctx, io)?,
            WizardStep::Contact => contact_step(ctx, io)?,
            WizardStep::Identity => identity_step(ctx, io)?,
            WizardStep::Summary { preview } => summary_step(ctx, io, &preview)?,
            WizardStep::Success(receipt) => {
                if !success_step(ctx, io, &receipt)? {
                    return Ok(());
                }
            }
            WizardStep::Landing => {
                output::info("Customer creation cancelled. Run `create` to resume.");
                return Ok(());
            }
        }
    }
}

fn header(ctx: &ShellContext, io: &mut dyn Interaction, title: &str) -> CommandResult {
    io.clear_screen()?;
    let position = ctx.wizard.step().position().unwrap_or(STEP_COUNT);
    output::section(format!("Create Customer - Step {position} of {STEP_COUNT}: {title}"));
    Ok(())
}

fn prompt_text(io: &mut dyn Interaction, label: &str, value: &mut String) -> CommandResult {
    *value = io.text(label, value)?;
    Ok(())
}

fn prompt_choice<C: Choice>(
    io: &mut dyn Interaction,
    label: &str,
    value: &mut String,
) -> CommandResult {
    let current = C::parse(value).and_then(|choice| {
        C::all()
            .iter()
            .position(|candidate| candidate.wire_value() == choice.wire_value())
    });
    if let Some(index) = io.select(label, &C::labels(), current)? {
        *value = C::all()[index].wire_value().to_string();
    }
    Ok(())
}

fn choose_action(
    io: &mut dyn Interaction,
    actions: &[(StepAction, &str)],
) -> Result<StepAction, CommandError> {
    let labels: Vec<String> = actions.iter().map(|(_, label)| label.to_string()).collect();
    let picked = io.select("Action", &labels, Some(0))?.unwrap_or(0);
    Ok(actions
        .get(picked)
        .map(|(action, _)| *action)
        .unwrap_or(StepAction::Next))
}

fn print_errors(errors: &FieldErrors) {
    output::error("Please correct the following fields:");
    for (key, message) in errors.iter() {
        output::plain(format!("  - {key}: {message}"));
    }
}

/// Applies a navigation action. Returns `true` when the step is finished.
fn apply(
    ctx: &mut ShellContext,
    form: &mut dyn StepForm,
    action: StepAction,
) -> Result<bool, CommandError> {
    match action {
        StepAction::Next => match form.submit() {
            Some(payload) => {
                ctx.wizard.advance(payload)?;
                Ok(true)
            }
            None => {
                print_errors(form.errors());
                Ok(false)
            }
        },
        StepAction::Back => {
            ctx.wizard.back()?;
            Ok(true)
        }
        StepAction::Cancel => {
            ctx.wizard.cancel();
            Ok(true)
        }
        StepAction::AddEntry | StepAction::RemoveEntry => Ok(false),
    }
}

fn personal_step(ctx: &mut ShellContext, io: &mut dyn Interaction) -> CommandResult {
    let mut form = PersonalForm::from_draft(ctx.wizard.store().draft());
    loop {
        header(ctx, io, form.title())?;
        let fields = &mut form.fields;
        prompt_text(io, "First name", &mut fields.first_name)?;
        prompt_text(io, "Middle name (optional)", &mut fields.middle_name)?;
        prompt_text(io, "Last name", &mut fields.last_name)?;
        prompt_text(io, "Date of birth (YYYY-MM-DD)", &mut fields.date_of_birth)?;
        prompt_choice::<Gender>(io, "Gender", &mut fields.gender)?;
        prompt_choice::<Language>(io, "Preferred language", &mut fields.language)?;

        let action = choose_action(
            io,
            &[(StepAction::Next, "Next"), (StepAction::Cancel, "Cancel")],
        )?;
        if apply(ctx, &mut form, action)? {
            return Ok(());
        }
    }
}

fn address_step(ctx: &mut ShellContext, io: &mut dyn Interaction) -> CommandResult {
    let mut form = AddressForm::from_draft(ctx.wizard.store().draft());
    loop {
        header(ctx, io, form.title())?;
        let fields = &mut form.fields;
        prompt_text(io, "Address line 1", &mut fields.address_line1)?;
        prompt_text(io, "Address line 2 (optional)", &mut fields.address_line2)?;
        prompt_text(io, "City", &mut fields.city)?;
        prompt_text(io, "State", &mut fields.state)?;
        prompt_choice::<Country>(io, "Country", &mut fields.country)?;
        prompt_text(io, "Zip code", &mut fields.zip_code)?;

        let action = choose_action(
            io,
            &[
                (StepAction::Next, "Next"),
                (StepAction::Back, "Back"),
                (StepAction::Cancel, "Cancel"),
            ],
        )?;
        if apply(ctx, &mut form, action)? {
            return Ok(());
        }
    }
}

fn entry_actions(
    can_remove: bool,
    add_label: &'static str,
    remove_label: &'static str,
) -> Vec<(StepAction, &'static str)> {
    let mut actions = vec![(StepAction::Next, "Next"), (StepAction::AddEntry, add_label)];
    if can_remove {
        actions.push((StepAction::RemoveEntry, remove_label));
    }
    actions.push((StepAction::Back, "Back"));
    actions.push((StepAction::Cancel, "Cancel"));
    actions
}

fn pick_entry(
    io: &mut dyn Interaction,
    prompt: &str,
    labels: Vec<String>,
) -> Result<Option<usize>, CommandError> {
    io.select(prompt, &labels, None)
}

fn contact_step(ctx: &mut ShellContext, io: &mut dyn Interaction) -> CommandResult {
    let mut form = ContactForm::from_draft(ctx.wizard.store().draft());
    let mut pending: Vec<usize> = (0..form.entries().len()).collect();
    loop {
        header(ctx, io, form.title())?;
        for index in pending.drain(..) {
            let Some(entry) = form.entry_mut(index) else {
                continue;
            };
            output::plain(format!("Contact #{}", index + 1));
            prompt_choice::<ContactType>(io, "Type", &mut entry.kind)?;
            prompt_text(io, "Value", &mut entry.value)?;
            if ContactType::parse(&entry.kind) == Some(ContactType::Phone) {
                prompt_text(io, "Dial code (optional)", &mut entry.dial_code)?;
            }
        }

        let actions = entry_actions(
            form.can_remove(),
            "Add another contact",
            "Remove a contact",
        );
        match choose_action(io, &actions)? {
            StepAction::AddEntry => pending.push(form.add_entry()),
            StepAction::RemoveEntry => {
                let labels = form
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        format!("#{} {} {}", index + 1, entry.kind, entry.value)
                    })
                    .collect();
                if let Some(index) = pick_entry(io, "Remove which contact?", labels)? {
                    form.remove_entry(index);
                }
            }
            action => {
                if apply(ctx, &mut form, action)? {
                    return Ok(());
                }
                pending = (0..form.entries().len()).collect();
            }
        }
    }
}

fn identity_step(ctx: &mut ShellContext, io: &mut dyn Interaction) -> CommandResult {
    let mut form = IdentityForm::from_draft(ctx.wizard.store().draft());
    let mut pending: Vec<usize> = (0..form.entries().len()).collect();
    loop {
        header(ctx, io, form.title())?;
        for index in pending.drain(..) {
            let Some(entry) = form.entry_mut(index) else {
                continue;
            };
            output::plain(format!("ID proof #{}", index + 1));
            prompt_choice::<IdentityProofType>(io, "ID type", &mut entry.kind)?;
            prompt_text(io, "ID number", &mut entry.value)?;
            prompt_text(io, "Issue date (YYYY-MM-DD)", &mut entry.issued_date)?;
            prompt_text(io, "Expiry date (YYYY-MM-DD)", &mut entry.expiry_date)?;
        }

        let actions = entry_actions(
            form.can_remove(),
            "Add another ID proof",
            "Remove an ID proof",
        );
        match choose_action(io, &actions)? {
            StepAction::AddEntry => pending.push(form.add_entry()),
            StepAction::RemoveEntry => {
                let labels = form
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        format!("#{} {} {}", index + 1, entry.kind, entry.value)
                    })
                    .collect();
                if let Some(index) = pick_entry(io, "Remove which ID proof?", labels)? {
                    form.remove_entry(index);
                }
            }
            action => {
                if apply(ctx, &mut form, action)? {
                    return Ok(());
                }
                pending = (0..form.entries().len()).collect();
            }
        }
    }
}

fn summary_step(
    ctx: &mut ShellContext,
    io: &mut dyn Interaction,
    preview: &Customer,
) -> CommandResult {
    header(ctx, io, "Review")?;
    output::plain(render_customer(preview, DisplayMode::Preview).render());

    let action = choose_action(
        io,
        &[
            (StepAction::Next, "Submit"),
            (StepAction::Back, "Back"),
            (StepAction::Cancel, "Cancel"),
        ],
    )?;
    match action {
        StepAction::Next => {
            ctx.submit_wizard()?;
        }
        StepAction::Back => {
            ctx.wizard.back()?;
        }
        _ => ctx.wizard.cancel(),
    }
    Ok(())
}

/// Returns `true` when the user starts another customer.
fn success_step(
    ctx: &mut ShellContext,
    io: &mut dyn Interaction,
    receipt: &SubmissionReceipt,
) -> Result<bool, CommandError> {
    output::section("Customer Created Successfully!");
    output::plain(format!("Customer: {}", receipt.customer_name));
    if let Some(id) = &receipt.customer_id {
        output::plain(format!("Customer ID: {id}"));
    }

    let mut options = Vec::new();
    if receipt.customer_id.is_some() {
        options.push("View Customer Details");
    }
    options.extend(["View All Customers", "Add Another Customer", "Done"]);
    let labels: Vec<String> = options.iter().map(|label| label.to_string()).collect();
    let done = labels.len() - 1;
    let picked = io.select("What next?", &labels, Some(done))?.unwrap_or(done);

    match options.get(picked).copied() {
        Some("Add Another Customer") => {
            ctx.wizard.begin();
            Ok(true)
        }
        Some("View Customer Details") => {
            ctx.wizard.cancel();
            if let Some(id) = &receipt.customer_id {
                ctx.show_customer(id)?;
            }
            Ok(false)
        }
        Some("View All Customers") => {
            ctx.wizard.cancel();
            ctx.list_customers(io)?;
            Ok(false)
        }
        _ => {
            ctx.wizard.cancel();
            Ok(false)
        }
    }
}

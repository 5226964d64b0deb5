use std::{collections::VecDeque, time::Duration};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Item, ItemId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    form::ItemForm,
    orchestration::dispatch_backend_command,
};
use crate::ui::theme;

enum RowAction {
    Edit(Item),
    Delete(ItemId),
}

pub struct InventoryApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    form: ItemForm,
    items: Vec<Item>,
    alerts: VecDeque<UiError>,
    status: String,
}

impl InventoryApp {
    /// Creates the screen and asks the backend for the initial list.
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            form: ItemForm::default(),
            items: Vec::new(),
            alerts: VecDeque::new(),
            status: "Loading inventory...".to_string(),
        };
        app.queue(BackendCommand::RefreshItems);
        app
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::ItemsLoaded(items) => {
                self.status = match items.len() {
                    1 => "1 item".to_string(),
                    n => format!("{n} items"),
                };
                self.items = items;
            }
            UiEvent::Error(err) => {
                tracing::warn!(title = err.title(), message = err.message(), "showing alert");
                self.alerts.push_back(err);
            }
        }
    }

    fn submit_form(&mut self) {
        if let Some(cmd) = self.form.submit() {
            self.queue(cmd);
        }
    }

    fn apply_row_action(&mut self, action: RowAction) {
        match action {
            RowAction::Edit(item) => self.form.begin_edit(&item),
            RowAction::Delete(id) => self.queue(BackendCommand::DeleteItem { id }),
        }
    }

    fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let name_edit = egui::TextEdit::singleline(&mut self.form.name)
            .id_salt("item_name")
            .hint_text("Product (e.g. Rice)")
            .desired_width(f32::INFINITY);
        ui.add(name_edit);

        let quantity_edit = egui::TextEdit::singleline(&mut self.form.quantity)
            .id_salt("item_quantity")
            .hint_text("Quantity (e.g. 1kg)")
            .desired_width(f32::INFINITY);
        let quantity_resp = ui.add(quantity_edit);
        let enter_pressed =
            quantity_resp.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

        let button = egui::Button::new(self.form.submit_label()).min_size(egui::vec2(ui.available_width(), 30.0));
        if ui.add(button).clicked() || enter_pressed {
            self.submit_form();
        }
    }

    fn show_item_table(&self, ui: &mut egui::Ui) -> Option<RowAction> {
        let mut action = None;
        let column_width = (ui.available_width() / 3.0 - 8.0).max(60.0);

        egui::Grid::new("inventory_header")
            .num_columns(3)
            .min_col_width(column_width)
            .show(ui, |ui| {
                ui.strong("Product");
                ui.strong("Quantity");
                ui.strong("Actions");
                ui.end_row();
            });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("inventory_rows")
                    .num_columns(3)
                    .min_col_width(column_width)
                    .striped(true)
                    .show(ui, |ui| {
                        for item in &self.items {
                            ui.label(&item.name);
                            ui.label(&item.quantity);
                            ui.horizontal(|ui| {
                                let edit = egui::Button::new(
                                    egui::RichText::new("Edit").color(theme::ROW_BUTTON_TEXT),
                                )
                                .fill(theme::EDIT_BUTTON_FILL);
                                if ui.add(edit).clicked() {
                                    action = Some(RowAction::Edit(item.clone()));
                                }
                                let delete = egui::Button::new(
                                    egui::RichText::new("X").color(theme::ROW_BUTTON_TEXT),
                                )
                                .fill(theme::DELETE_BUTTON_FILL);
                                if ui.add(delete).clicked() {
                                    action = Some(RowAction::Delete(item.id.clone()));
                                }
                            });
                            ui.end_row();
                        }
                    });
            });

        action
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.alerts.front() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(alert.title())
            .id(egui::Id::new("inventory_alert"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(alert.message());
                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.dismiss_alert();
        }
    }
}

impl eframe::App for InventoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });

        let blocked = !self.alerts.is_empty();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(
                        egui::RichText::new("Cloud Inventory ☁")
                            .strong()
                            .color(theme::TITLE_COLOR),
                    );
                });
                ui.add_space(12.0);
                self.show_form(ui);
                ui.add_space(12.0);
                if let Some(action) = self.show_item_table(ui) {
                    self.apply_row_action(action);
                }
            });
        });

        self.show_alert(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

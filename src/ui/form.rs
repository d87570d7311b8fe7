//! The travel form: a two-tab editor over a draft copy of one travel record.
//!
//! Edits never touch the store directly. The draft is handed back through
//! [`TravelForm::commit`] when the user saves and dropped when they cancel.

use crate::types::{CountryCode, TravelRecord};
use eframe::egui;

/// Which half of the record the form is showing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FormTab {
    #[default]
    Standard,
    Custom,
}

/// A single-line field of the structured tab.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    FlightDeparture,
    FlightArrival,
    FlightAirline,
    FlightPrice,
    FlightBookingReference,
    HotelName,
    HotelAddress,
    CheckIn,
    CheckOut,
    AccommodationPrice,
    AccommodationBookingReference,
    RentalCompany,
    RentalVehicleType,
    RentalPrice,
    TransitPasses,
    TransitNotes,
}

impl FormField {
    pub const FLIGHTS: [FormField; 5] = [
        FormField::FlightDeparture,
        FormField::FlightArrival,
        FormField::FlightAirline,
        FormField::FlightPrice,
        FormField::FlightBookingReference,
    ];

    pub const ACCOMMODATION: [FormField; 6] = [
        FormField::HotelName,
        FormField::HotelAddress,
        FormField::CheckIn,
        FormField::CheckOut,
        FormField::AccommodationPrice,
        FormField::AccommodationBookingReference,
    ];

    pub const RENTAL_CAR: [FormField; 3] = [
        FormField::RentalCompany,
        FormField::RentalVehicleType,
        FormField::RentalPrice,
    ];

    pub const PUBLIC_TRANSIT: [FormField; 2] = [FormField::TransitPasses, FormField::TransitNotes];

    pub fn label(self) -> &'static str {
        match self {
            FormField::FlightDeparture => "Departure",
            FormField::FlightArrival => "Arrival",
            FormField::FlightAirline => "Airline",
            FormField::FlightPrice => "Price",
            FormField::FlightBookingReference => "Booking Reference",
            FormField::HotelName => "Hotel Name",
            FormField::HotelAddress => "Address",
            FormField::CheckIn => "Check-in",
            FormField::CheckOut => "Check-out",
            FormField::AccommodationPrice => "Price per Night",
            FormField::AccommodationBookingReference => "Booking Reference",
            FormField::RentalCompany => "Company",
            FormField::RentalVehicleType => "Vehicle Type",
            FormField::RentalPrice => "Price per Day",
            FormField::TransitPasses => "Passes",
            FormField::TransitNotes => "Notes",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            FormField::FlightDeparture => "Departure airport",
            FormField::FlightArrival => "Arrival airport",
            FormField::FlightAirline => "Airline name",
            FormField::FlightPrice | FormField::AccommodationPrice | FormField::RentalPrice => "0",
            FormField::FlightBookingReference | FormField::AccommodationBookingReference => {
                "Confirmation number"
            }
            FormField::HotelName => "Hotel name",
            FormField::HotelAddress => "Hotel address",
            FormField::CheckIn | FormField::CheckOut => "YYYY-MM-DD",
            FormField::RentalCompany => "Rental company",
            FormField::RentalVehicleType => "Car type",
            FormField::TransitPasses => "Metro pass, Bus pass",
            FormField::TransitNotes => "Transit notes",
        }
    }

    /// Numeric fields keep the typed text and store its parsed value.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FormField::FlightPrice | FormField::AccommodationPrice | FormField::RentalPrice
        )
    }
}

/// One of the ordered string lists of the free-form tab.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListKind {
    Attractions,
    Restaurants,
    Activities,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Attractions, ListKind::Restaurants, ListKind::Activities];

    fn title(self) -> &'static str {
        match self {
            ListKind::Attractions => "Attractions",
            ListKind::Restaurants => "Restaurants",
            ListKind::Activities => "Activities",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            ListKind::Attractions => "Add attraction",
            ListKind::Restaurants => "Add restaurant",
            ListKind::Activities => "Add activity",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// What the user asked for this frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Save,
    Cancel,
    Delete,
}

/// Separator used to show transit passes as one line of text.
const PASS_SEPARATOR: &str = ", ";

/// Parses numeric form input, coercing anything unusable to `0`.
pub fn parse_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// Editor state for one country's travel record.
#[derive(Debug, Clone)]
pub struct TravelForm {
    code: CountryCode,
    country_name: String,
    draft: TravelRecord,
    pub tab: FormTab,
    flight_price: String,
    accommodation_price: String,
    rental_price: String,
    transit_passes: String,
    budget: String,
    /// Pending text of the "add item" inputs, indexed by [`ListKind`]
    new_items: [String; 3],
}

impl TravelForm {
    /// Opens the form over a copy of `record`.
    pub fn new(code: &str, country_name: &str, record: TravelRecord) -> Self {
        let flights = &record.standard_travel.flights;
        let accommodation = &record.standard_travel.accommodation;
        let transport = &record.standard_travel.transportation;

        Self {
            code: code.to_string(),
            country_name: country_name.to_string(),
            flight_price: format_number(flights.price),
            accommodation_price: format_number(accommodation.price),
            rental_price: format_number(transport.rental_car.price),
            transit_passes: transport.public_transit.passes.join(PASS_SEPARATOR),
            budget: format_number(record.custom_details.budget),
            draft: record,
            tab: FormTab::default(),
            new_items: Default::default(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    /// The record as it would be committed right now.
    pub fn draft(&self) -> &TravelRecord {
        &self.draft
    }

    /// Current text of a structured field.
    pub fn field_value(&self, field: FormField) -> String {
        let travel = &self.draft.standard_travel;
        match field {
            FormField::FlightDeparture => travel.flights.departure.clone(),
            FormField::FlightArrival => travel.flights.arrival.clone(),
            FormField::FlightAirline => travel.flights.airline.clone(),
            FormField::FlightPrice => self.flight_price.clone(),
            FormField::FlightBookingReference => travel.flights.booking_reference.clone(),
            FormField::HotelName => travel.accommodation.hotel_name.clone(),
            FormField::HotelAddress => travel.accommodation.address.clone(),
            FormField::CheckIn => travel.accommodation.check_in.clone(),
            FormField::CheckOut => travel.accommodation.check_out.clone(),
            FormField::AccommodationPrice => self.accommodation_price.clone(),
            FormField::AccommodationBookingReference => {
                travel.accommodation.booking_reference.clone()
            }
            FormField::RentalCompany => travel.transportation.rental_car.company.clone(),
            FormField::RentalVehicleType => travel.transportation.rental_car.vehicle_type.clone(),
            FormField::RentalPrice => self.rental_price.clone(),
            FormField::TransitPasses => self.transit_passes.clone(),
            FormField::TransitNotes => travel.transportation.public_transit.notes.clone(),
        }
    }

    /// Replaces a structured field with `value`.
    pub fn set_field(&mut self, field: FormField, value: &str) {
        let travel = &mut self.draft.standard_travel;
        let text = value.to_string();
        match field {
            FormField::FlightDeparture => travel.flights.departure = text,
            FormField::FlightArrival => travel.flights.arrival = text,
            FormField::FlightAirline => travel.flights.airline = text,
            FormField::FlightPrice => {
                travel.flights.price = parse_number(value);
                self.flight_price = text;
            }
            FormField::FlightBookingReference => travel.flights.booking_reference = text,
            FormField::HotelName => travel.accommodation.hotel_name = text,
            FormField::HotelAddress => travel.accommodation.address = text,
            FormField::CheckIn => travel.accommodation.check_in = text,
            FormField::CheckOut => travel.accommodation.check_out = text,
            FormField::AccommodationPrice => {
                travel.accommodation.price = parse_number(value);
                self.accommodation_price = text;
            }
            FormField::AccommodationBookingReference => {
                travel.accommodation.booking_reference = text
            }
            FormField::RentalCompany => travel.transportation.rental_car.company = text,
            FormField::RentalVehicleType => travel.transportation.rental_car.vehicle_type = text,
            FormField::RentalPrice => {
                travel.transportation.rental_car.price = parse_number(value);
                self.rental_price = text;
            }
            FormField::TransitPasses => {
                travel.transportation.public_transit.passes = value
                    .split(PASS_SEPARATOR)
                    .filter(|pass| !pass.is_empty())
                    .map(str::to_string)
                    .collect();
                self.transit_passes = text;
            }
            FormField::TransitNotes => travel.transportation.public_transit.notes = text,
        }
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.draft.custom_details.notes = notes.to_string();
    }

    pub fn budget_text(&self) -> &str {
        &self.budget
    }

    pub fn set_budget(&mut self, text: &str) {
        self.draft.custom_details.budget = parse_number(text);
        self.budget = text.to_string();
    }

    pub fn items(&self, list: ListKind) -> &[String] {
        let details = &self.draft.custom_details;
        match list {
            ListKind::Attractions => &details.attractions,
            ListKind::Restaurants => &details.restaurants,
            ListKind::Activities => &details.activities,
        }
    }

    fn items_mut(&mut self, list: ListKind) -> &mut Vec<String> {
        let details = &mut self.draft.custom_details;
        match list {
            ListKind::Attractions => &mut details.attractions,
            ListKind::Restaurants => &mut details.restaurants,
            ListKind::Activities => &mut details.activities,
        }
    }

    /// Appends the trimmed `value` to `list`. Blank input is ignored.
    ///
    /// Returns whether an item was added.
    pub fn add_item(&mut self, list: ListKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.items_mut(list).push(value.to_string());
        true
    }

    /// Removes the item at `index`, keeping the order of the rest.
    /// Out-of-range indices are ignored.
    pub fn remove_item(&mut self, list: ListKind, index: usize) {
        let items = self.items_mut(list);
        if index < items.len() {
            items.remove(index);
        }
    }

    /// Finishes editing and returns the record, stamped with the current time.
    pub fn commit(mut self) -> TravelRecord {
        self.draft.touch();
        self.draft
    }

    /// Draws the form and returns the button the user pressed, if any.
    ///
    /// `is_saved` enables the delete button for countries that already have
    /// a stored plan.
    pub fn show(&mut self, ui: &mut egui::Ui, is_saved: bool) -> FormAction {
        let mut action = FormAction::None;

        ui.horizontal(|ui| {
            ui.heading(&self.country_name);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close").clicked() {
                    action = FormAction::Cancel;
                }
            });
        });
        ui.label("Plan your travel details");
        ui.separator();

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, FormTab::Standard, "Standard Travel");
            ui.selectable_value(&mut self.tab, FormTab::Custom, "Custom Details");
        });
        ui.separator();

        let footer_height = ui.spacing().interact_size.y + 12.0;
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - footer_height).max(0.0))
            .auto_shrink([false, false])
            .show(ui, |ui| match self.tab {
                FormTab::Standard => self.show_standard_tab(ui),
                FormTab::Custom => self.show_custom_tab(ui),
            });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Save Travel Plan").clicked() {
                action = FormAction::Save;
            }
            if ui.button("Cancel").clicked() {
                action = FormAction::Cancel;
            }
            if is_saved && ui.button("Delete plan").clicked() {
                action = FormAction::Delete;
            }
        });

        action
    }

    fn show_standard_tab(&mut self, ui: &mut egui::Ui) {
        self.show_field_group(ui, "✈ Flights", &FormField::FLIGHTS);
        self.show_field_group(ui, "🏨 Accommodation", &FormField::ACCOMMODATION);
        ui.strong("🚗 Transportation");
        self.show_field_group(ui, "Rental Car", &FormField::RENTAL_CAR);
        self.show_field_group(ui, "Public Transit", &FormField::PUBLIC_TRANSIT);
    }

    fn show_field_group(&mut self, ui: &mut egui::Ui, title: &str, fields: &[FormField]) {
        egui::CollapsingHeader::new(title)
            .default_open(true)
            .show(ui, |ui| {
                egui::Grid::new(title)
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        for &field in fields {
                            ui.label(field.label());
                            let mut value = self.field_value(field);
                            let mut edit =
                                egui::TextEdit::singleline(&mut value).hint_text(field.hint());
                            if field.is_numeric() {
                                edit = edit.desired_width(100.0);
                            }
                            if ui.add(edit).changed() {
                                self.set_field(field, &value);
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn show_custom_tab(&mut self, ui: &mut egui::Ui) {
        for list in ListKind::ALL {
            self.show_list(ui, list);
            ui.add_space(8.0);
        }

        ui.strong("Notes");
        let mut notes = self.draft.custom_details.notes.clone();
        let edit = egui::TextEdit::multiline(&mut notes)
            .hint_text("Additional notes...")
            .desired_rows(4)
            .desired_width(f32::INFINITY);
        if ui.add(edit).changed() {
            self.set_notes(&notes);
        }

        ui.add_space(8.0);
        ui.strong("Budget");
        let mut budget = self.budget.clone();
        let edit = egui::TextEdit::singleline(&mut budget).hint_text("Total budget");
        if ui.add(edit).changed() {
            self.set_budget(&budget);
        }
    }

    fn show_list(&mut self, ui: &mut egui::Ui, list: ListKind) {
        ui.strong(list.title());

        let mut remove = None;
        for (index, item) in self.items(list).iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(item);
                if ui.small_button("✕").on_hover_text("Remove").clicked() {
                    remove = Some(index);
                }
            });
        }
        if let Some(index) = remove {
            self.remove_item(list, index);
        }

        ui.horizontal(|ui| {
            let slot = list.index();
            let edit = egui::TextEdit::singleline(&mut self.new_items[slot]).hint_text(list.hint());
            let response = ui.add(edit);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted || ui.button("Add").clicked() {
                let value = std::mem::take(&mut self.new_items[slot]);
                if self.add_item(list, &value) {
                    response.request_focus();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TravelForm {
        TravelForm::new("FR", "France", TravelRecord::empty("FR", "France"))
    }

    #[test]
    fn parse_number_coerces_bad_input_to_zero() {
        assert_eq!(parse_number("500"), 500.0);
        assert_eq!(parse_number(" 12.5 "), 12.5);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
    }

    #[test]
    fn text_fields_are_replaced() {
        let mut form = form();
        form.set_field(FormField::FlightAirline, "Air France");
        form.set_field(FormField::HotelName, "Hotel du Louvre");
        form.set_field(FormField::RentalVehicleType, "Compact");

        let travel = &form.draft().standard_travel;
        assert_eq!(travel.flights.airline, "Air France");
        assert_eq!(travel.accommodation.hotel_name, "Hotel du Louvre");
        assert_eq!(travel.transportation.rental_car.vehicle_type, "Compact");
        assert_eq!(form.field_value(FormField::HotelName), "Hotel du Louvre");
    }

    #[test]
    fn numeric_fields_keep_text_and_store_value() {
        let mut form = form();
        form.set_field(FormField::FlightPrice, "12.");
        assert_eq!(form.field_value(FormField::FlightPrice), "12.");
        assert_eq!(form.draft().standard_travel.flights.price, 12.0);

        form.set_field(FormField::RentalPrice, "cheap");
        assert_eq!(form.draft().standard_travel.transportation.rental_car.price, 0.0);
        assert_eq!(form.field_value(FormField::RentalPrice), "cheap");
    }

    #[test]
    fn transit_passes_split_on_separator() {
        let mut form = form();
        form.set_field(FormField::TransitPasses, "Navigo, Paris Visite, ");
        assert_eq!(
            form.draft().standard_travel.transportation.public_transit.passes,
            vec!["Navigo".to_string(), "Paris Visite".to_string()]
        );
    }

    #[test]
    fn existing_record_populates_buffers() {
        let mut record = TravelRecord::empty("FR", "France");
        record.custom_details.budget = 500.0;
        record.standard_travel.transportation.public_transit.passes =
            vec!["Navigo".to_string(), "Velib".to_string()];

        let form = TravelForm::new("FR", "France", record);
        assert_eq!(form.budget_text(), "500");
        assert_eq!(form.field_value(FormField::TransitPasses), "Navigo, Velib");
        assert_eq!(form.field_value(FormField::FlightPrice), "");
    }

    #[test]
    fn add_item_trims_and_ignores_blank() {
        let mut form = form();
        assert!(form.add_item(ListKind::Attractions, "  Louvre  "));
        assert!(!form.add_item(ListKind::Attractions, "   "));
        assert_eq!(form.items(ListKind::Attractions), ["Louvre".to_string()]);
    }

    #[test]
    fn removing_only_item_empties_list() {
        let mut form = form();
        form.add_item(ListKind::Attractions, "Louvre");
        form.remove_item(ListKind::Attractions, 0);
        assert!(form.items(ListKind::Attractions).is_empty());
    }

    #[test]
    fn removing_middle_item_preserves_order() {
        let mut form = form();
        for item in ["Crepes", "Bistro", "Boulangerie"] {
            form.add_item(ListKind::Restaurants, item);
        }
        form.remove_item(ListKind::Restaurants, 1);
        assert_eq!(
            form.items(ListKind::Restaurants),
            ["Crepes".to_string(), "Boulangerie".to_string()]
        );
    }

    #[test]
    fn out_of_range_remove_is_ignored() {
        let mut form = form();
        form.add_item(ListKind::Activities, "Seine cruise");
        form.remove_item(ListKind::Activities, 5);
        assert_eq!(form.items(ListKind::Activities).len(), 1);
    }

    #[test]
    fn commit_returns_draft_with_fresh_timestamp() {
        let mut record = TravelRecord::empty("FR", "France");
        record.last_updated = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
        let mut form = TravelForm::new("FR", "France", record);
        form.set_budget("500");
        form.set_notes("Spring trip");

        let committed = form.commit();
        assert_eq!(committed.custom_details.budget, 500.0);
        assert_eq!(committed.custom_details.notes, "Spring trip");
        assert!(committed.last_updated > chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);
    }

    #[test]
    fn lists_are_independent() {
        let mut form = form();
        form.add_item(ListKind::Attractions, "Louvre");
        form.add_item(ListKind::Activities, "Cooking class");
        assert_eq!(form.items(ListKind::Restaurants).len(), 0);
        assert_eq!(form.items(ListKind::Attractions).len(), 1);
        assert_eq!(form.items(ListKind::Activities).len(), 1);
    }
}

use arboard::Clipboard;
use macroquad::prelude::*;

use raybox::block::{CellContent, WallKind};
use raybox::cell_map::CellMap;
use raybox::config::Config;
use raybox::direction::{Direction, MovementCombo};
use raybox::edit_log::{EditAction, EditLog};
use raybox::geometry::{
    cell_rect, cell_subrect, closest_side, distance_to_closest_side, split_position,
};
use raybox::player::Player;
use raybox::ray::SegmentEnd;
use raybox::raycast::{CastRay, Raycaster};
use raybox::save_state::SaveState;

const MAIN_COLOR: Color = WHITE;
const MIRROR_COLOR: Color = Color::new(0.25, 0.25, 0.25, 1.0);
const PORTAL_COLOR: Color = Color::new(0.5, 0.0, 1.0, 1.0);
const CURSOR_COLOR: Color = Color::new(0.0, 1.0, 1.0, 1.0);

/// Gamemode toggles for the simulation.
#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Play,
    Map,
}

/// What a mouse click paints onto the map.
#[derive(Clone, Copy)]
enum Brush {
    Wall,
    Mirror,
    Portal,
    Erase,
}

/// Raycasting sandbox.
struct Sandbox {
    config: Config,
    map: CellMap,
    player: Player,
    raycaster: Raycaster,
    mode: Mode,
    running: bool,

    /// First half of a portal pair picked in the editor.
    first_portal: Option<((i32, i32), Direction)>,
    /// Cells already painted during the current drag.
    edited_cells: Vec<(i32, i32)>,
    edit_log: EditLog,

    // layout derived from the configuration
    screen_width: f32,
    screen_height: f32,
    map_length: f32,
    square_size: f32,
    column_width: f32,
    /// Maximum ray travel in pixels.
    visible_distance: f32,
}

impl Sandbox {
    fn new(config: Config) -> Self {
        // reduce screen dimensions to conform to configuration
        let screen_width = config.window.width - config.window.width % config.raycast.column_width;
        let square_size = screen_width.min(config.window.height) / config.map.size;
        let screen_height = config.window.height - config.window.height % square_size;

        // width and height of map in pixels (square map)
        let map_length = (square_size * config.map.size) as f32;
        let render_columns = (screen_width / config.raycast.column_width) as usize;

        // maximum length of any ray on the map is along the diagonal
        let visible_cells = config
            .raycast
            .visible_distance
            .min(std::f32::consts::SQRT_2 * config.map.size as f32);

        let map = CellMap::new(config.map.size, config.map.size, square_size as f32);
        let radius = square_size as f32 * config.player.radius_scale / 2.0;
        let player = Player::new(
            (map_length / 2.0, map_length / 2.0),
            radius,
            config.player.speed,
            config.player.turn_speed,
        );
        let raycaster = Raycaster::new(config.raycast.fov, render_columns);

        Sandbox {
            map,
            player,
            raycaster,
            mode: Mode::Play,
            running: true,
            first_portal: None,
            edited_cells: Vec::new(),
            edit_log: EditLog::new(),
            screen_width: screen_width as f32,
            screen_height: screen_height as f32,
            map_length,
            square_size: square_size as f32,
            column_width: config.raycast.column_width as f32,
            visible_distance: visible_cells * square_size as f32,
            config,
        }
    }

    /// Top-left corner of the map on screen for the current mode.
    fn map_offset(&self) -> (f32, f32, f32) {
        match self.mode {
            Mode::Map => (
                self.screen_width / 2.0 - self.map_length / 2.0,
                self.screen_height / 2.0 - self.map_length / 2.0,
                1.0,
            ),
            Mode::Play => (
                self.screen_width - self.map_length * self.config.map.scale,
                self.screen_height - self.map_length * self.config.map.scale,
                self.config.map.scale,
            ),
        }
    }

    fn handle_keys(&mut self) {
        if is_key_pressed(KeyCode::Escape) {
            self.running = false;
        }
        if is_key_pressed(KeyCode::Space) {
            self.mode = if self.mode == Mode::Play { Mode::Map } else { Mode::Play };
        }
        if is_key_pressed(KeyCode::C) {
            self.map.clear();
            self.first_portal = None;
            self.edit_log.log(EditAction::ClearMap);
        }
        if is_key_pressed(KeyCode::R) {
            self.player.flip();
        }
        if is_key_pressed(KeyCode::V) {
            self.copy_layout_to_clipboard();
        }
        if is_key_pressed(KeyCode::F5) {
            let path = self.config.map.save_path.clone();
            let state = SaveState::capture(&self.map, &self.player);
            match state.save_to_file(&path) {
                Ok(()) => {
                    println!("Saved map to {}", path);
                    self.edit_log.log(EditAction::SaveMap { path });
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        if is_key_pressed(KeyCode::F9) {
            let path = self.config.map.save_path.clone();
            match SaveState::load_from_file(&path) {
                Ok(state) => {
                    self.map = state.restore_map();
                    state.restore_player(&mut self.player);
                    self.first_portal = None;
                    println!("Loaded map from {}", path);
                    self.edit_log.log(EditAction::LoadMap { path });
                }
                Err(e) => eprintln!("{}", e),
            }
        }
    }

    fn movement_combo() -> MovementCombo {
        let mut combo = MovementCombo::NONE;
        if is_key_down(KeyCode::W) {
            combo |= MovementCombo::FORWARD;
        }
        if is_key_down(KeyCode::S) {
            combo |= MovementCombo::BACKWARD;
        }
        if is_key_down(KeyCode::A) {
            combo |= MovementCombo::LEFT;
        }
        if is_key_down(KeyCode::D) {
            combo |= MovementCombo::RIGHT;
        }
        combo
    }

    fn update_player(&mut self, delta_time: f32) {
        let mut turn = 0.0;
        if is_key_down(KeyCode::Left) {
            turn -= self.player.turn_speed * delta_time;
        }
        if is_key_down(KeyCode::Right) {
            turn += self.player.turn_speed * delta_time;
        }
        if turn != 0.0 {
            self.player.turn(turn);
        }
        let combo = Self::movement_combo();
        self.player.update(combo, &self.map, delta_time);
    }

    /// Handle all mouse inputs for editing the map. Returns the hovered
    /// cell and its closest side for the cursor overlays.
    fn handle_mouse(&mut self) -> ((i32, i32), Direction) {
        let (offset_x, offset_y, _) = self.map_offset();
        let (mouse_x, mouse_y) = mouse_position();
        let map_pos = (mouse_x - offset_x, mouse_y - offset_y);
        let (mouse_cell, mouse_cell_pos) = split_position(map_pos, self.square_size);
        let side = closest_side(mouse_cell_pos);

        if !is_mouse_button_down(MouseButton::Left) && !is_mouse_button_down(MouseButton::Right) {
            self.edited_cells.clear();
            return (mouse_cell, side);
        }

        let brush = if is_mouse_button_down(MouseButton::Left) {
            if is_key_down(KeyCode::LeftShift) {
                Brush::Mirror
            } else if is_key_down(KeyCode::LeftControl) {
                Brush::Portal
            } else {
                Brush::Wall
            }
        } else {
            Brush::Erase
        };

        if self.map.contains(mouse_cell.0, mouse_cell.1)
            && mouse_cell != self.player.cell(&self.map)
            && !self.edited_cells.contains(&mouse_cell)
        {
            self.update_cell(brush, mouse_cell, side);
        }
        (mouse_cell, side)
    }

    /// Update a cell on the cell map.
    fn update_cell(&mut self, brush: Brush, mouse_cell: (i32, i32), closest_side: Direction) {
        let (x, y) = mouse_cell;
        match brush {
            Brush::Wall => {
                self.map.set_cell_content(x, y, CellContent::Wall(WallKind::Normal));
                self.edited_cells.push(mouse_cell);
                self.edit_log.log(EditAction::PlaceWall { x, y });
            }
            Brush::Erase => {
                self.map.set_cell_content(x, y, CellContent::Empty);
                self.edited_cells.push(mouse_cell);
                self.edit_log.log(EditAction::Erase { x, y });
            }
            Brush::Mirror => {
                // first paint covers every side; repeats toggle the hovered one
                let sides = match *self.map.get(x, y) {
                    CellContent::Mirror { sides } => sides ^ closest_side,
                    _ => Direction::ALL,
                };
                self.map.set_cell_content(x, y, CellContent::Mirror { sides });
                self.edited_cells.push(mouse_cell);
                self.edit_log.log(EditAction::PlaceMirror { x, y, side: closest_side });
            }
            Brush::Portal => match self.first_portal {
                None => {
                    self.first_portal = Some((mouse_cell, closest_side));
                    self.edited_cells.push(mouse_cell);
                    self.edit_log.log(EditAction::PickPortalSide { x, y, side: closest_side });
                }
                Some((first_position, first_side)) => {
                    if first_position != mouse_cell || first_side != closest_side {
                        self.map.link_sides(first_position, first_side, mouse_cell, closest_side);
                        self.edited_cells.push(first_position);
                        self.edited_cells.push(mouse_cell);
                        self.edit_log.log(EditAction::LinkPortal {
                            first: first_position,
                            first_side,
                            second: mouse_cell,
                            second_side: closest_side,
                        });
                    }
                    self.first_portal = None;
                }
            },
        }
    }

    fn copy_layout_to_clipboard(&self) {
        let layout = self.map.to_layout_string();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&layout) {
                    println!("Failed to copy to clipboard: {}", e);
                } else {
                    println!("Map layout copied to clipboard!");
                    // keep the process alive long enough for clipboard managers
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                println!("Failed to access clipboard: {}", e);
            }
        }
    }

    /// Draw a single cell of the map.
    fn draw_cell(&self, x: i32, y: i32, offset: (f32, f32), scale: f32) {
        let place = |rect: (f32, f32, f32, f32)| {
            (
                offset.0 + rect.0 * scale,
                offset.1 + rect.1 * scale,
                rect.2 * scale,
                rect.3 * scale,
            )
        };
        let rect = place(cell_rect(x, y, self.square_size));
        let frame = (self.square_size / 8.0 * scale).max(1.0);
        match self.map.get(x, y) {
            CellContent::Wall(_) => {
                draw_rectangle(rect.0, rect.1, rect.2, rect.3, MAIN_COLOR);
            }
            CellContent::Mirror { sides } => {
                draw_rectangle_lines(rect.0, rect.1, rect.2, rect.3, frame, MAIN_COLOR);
                for index in sides.subrect_indices() {
                    if let Ok(subrect) = cell_subrect(x, y, self.square_size, index) {
                        let subrect = place(subrect);
                        draw_rectangle(subrect.0, subrect.1, subrect.2, subrect.3, MIRROR_COLOR);
                    }
                }
            }
            CellContent::Portal { links } => {
                draw_rectangle(rect.0, rect.1, rect.2, rect.3, MAIN_COLOR);
                for index in links.sides().subrect_indices() {
                    if let Ok(subrect) = cell_subrect(x, y, self.square_size, index) {
                        let subrect = place(subrect);
                        draw_rectangle(subrect.0, subrect.1, subrect.2, subrect.3, PORTAL_COLOR);
                    }
                }
            }
            CellContent::Empty => {}
        }
    }

    /// Draw the map, grid and player marker at the mode's offset and scale.
    fn draw_map(&self, rays: &[CastRay]) {
        let (offset_x, offset_y, scale) = self.map_offset();
        let offset = (offset_x, offset_y);

        draw_rectangle(
            offset_x,
            offset_y,
            self.map_length * scale,
            self.map_length * scale,
            Color::new(0.0, 0.0, 0.0, 0.5),
        );
        for y in 0..self.map.rows {
            for x in 0..self.map.columns {
                self.draw_cell(x, y, offset, scale);
            }
        }

        if self.config.map.show_grid && self.mode == Mode::Map {
            for x in 0..=self.map.columns {
                let line_x = offset_x + x as f32 * self.square_size * scale;
                draw_line(line_x, offset_y, line_x, offset_y + self.map_length * scale, 1.0, GRAY);
            }
            for y in 0..=self.map.rows {
                let line_y = offset_y + y as f32 * self.square_size * scale;
                draw_line(offset_x, line_y, offset_x + self.map_length * scale, line_y, 1.0, GRAY);
            }
        }

        self.draw_rays(rays, offset, scale);

        // player marker and facing
        let px = offset_x + self.player.position.0 * scale;
        let py = offset_y + self.player.position.1 * scale;
        draw_circle(px, py, self.player.radius * scale, BLUE);
        draw_line(
            px,
            py,
            px + self.player.direction.0 * self.square_size * scale,
            py + self.player.direction.1 * self.square_size * scale,
            1.0,
            BLUE,
        );
    }

    /// Draw ray segments (or their endpoints in ray-points mode) onto the map.
    fn draw_rays(&self, rays: &[CastRay], offset: (f32, f32), scale: f32) {
        for ray in rays {
            for segment in &ray.segments {
                let start = (offset.0 + segment.start.0 * scale, offset.1 + segment.start.1 * scale);
                let end = (offset.0 + segment.end.0 * scale, offset.1 + segment.end.1 * scale);
                if self.config.raycast.ray_points_mode {
                    draw_circle_lines(end.0, end.1, 3.0 * scale, 1.0, WHITE);
                    // flag points that drifted away from any cell edge
                    let (_, cell_pos) = split_position(segment.end, self.square_size);
                    if distance_to_closest_side(cell_pos) > 0.05 {
                        draw_circle_lines(end.0, end.1, 6.0 * scale, 1.0, YELLOW);
                    }
                } else {
                    let color = match segment.end_type {
                        SegmentEnd::Wall(WallKind::Normal) | SegmentEnd::Mirror | SegmentEnd::Portal => RED,
                        SegmentEnd::Wall(WallKind::Border) => BLUE,
                        SegmentEnd::MaxDistance => GREEN,
                    };
                    draw_line(start.0, start.1, end.0, end.1, 1.0, color);
                }
            }
        }
    }

    /// Render the first-person view for a fan of rays.
    fn draw_columns(&self, rays: &[CastRay]) {
        // sky and ground
        draw_rectangle(0.0, 0.0, self.screen_width, self.screen_height / 2.0, Color::new(0.78, 0.78, 0.78, 1.0));
        draw_rectangle(
            0.0,
            self.screen_height / 2.0,
            self.screen_width,
            self.screen_height / 2.0,
            Color::new(0.2, 0.2, 0.2, 1.0),
        );

        for (i, ray) in rays.iter().enumerate() {
            let Some(end_type) = ray.end_type() else {
                continue;
            };
            let SegmentEnd::Wall(kind) = end_type else {
                continue;
            };
            // distances render in cells so height falls off per square
            let distance = ray.corrected_distance() / self.square_size;
            let height = distance_to_height(distance);
            let base = if kind == WallKind::Border { BLACK } else { MAIN_COLOR };
            let color = dim_with_distance(base, distance);
            let x = i as f32 * self.column_width;
            draw_rectangle(
                x,
                self.screen_height * (0.5 - height / 2.0),
                self.column_width,
                self.screen_height * height,
                color,
            );
            if self.config.raycast.divide_columns {
                draw_line(x, 0.0, x, self.screen_height, 1.0, Color::new(0.25, 0.25, 0.25, 1.0));
            }
        }
    }

    /// Draw editor overlays: pending portal side, cell cursor, side cursor.
    fn draw_map_overlays(&self, mouse_cell: (i32, i32), side: Direction) {
        let (offset_x, offset_y, scale) = self.map_offset();
        let place = |rect: (f32, f32, f32, f32)| {
            (
                offset_x + rect.0 * scale,
                offset_y + rect.1 * scale,
                rect.2 * scale,
                rect.3 * scale,
            )
        };

        if let Some(((x, y), pending_side)) = self.first_portal {
            if let Some(&index) = pending_side.subrect_indices().first() {
                if let Ok(subrect) = cell_subrect(x, y, self.square_size, index) {
                    let subrect = place(subrect);
                    draw_rectangle(subrect.0, subrect.1, subrect.2, subrect.3, PORTAL_COLOR);
                }
            }
        }

        if self.map.contains(mouse_cell.0, mouse_cell.1) {
            let rect = place(cell_rect(mouse_cell.0, mouse_cell.1, self.square_size));
            draw_rectangle_lines(rect.0, rect.1, rect.2, rect.3, (self.square_size / 8.0).max(1.0), CURSOR_COLOR);

            if is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::LeftControl) {
                if let Some(&index) = side.subrect_indices().first() {
                    if let Ok(subrect) = cell_subrect(mouse_cell.0, mouse_cell.1, self.square_size, index) {
                        let subrect = place(subrect);
                        draw_rectangle(subrect.0, subrect.1, subrect.2, subrect.3, CURSOR_COLOR);
                    }
                }
            }
        }
    }

    fn draw_status_text(&self) {
        let (mouse_x, mouse_y) = mouse_position();
        let (offset_x, offset_y, _) = self.map_offset();
        let (cell, cell_pos) = split_position((mouse_x - offset_x, mouse_y - offset_y), self.square_size);
        draw_text(&format!("Mouse: ({:.0}, {:.0})", mouse_x, mouse_y), 10.0, 20.0, 20.0, WHITE);
        draw_text(&format!("Cell: ({}, {})", cell.0, cell.1), 10.0, 40.0, 20.0, WHITE);
        draw_text(
            &format!("Cell Position: ({:.3}, {:.3})", cell_pos.0, cell_pos.1),
            10.0,
            60.0,
            20.0,
            WHITE,
        );
    }

    fn frame(&mut self) {
        let delta_time = get_frame_time();
        self.handle_keys();
        if self.mode == Mode::Play {
            self.update_player(delta_time);
        }

        clear_background(BLACK);

        let rays = self.raycaster.cast_fan(
            &self.map,
            self.player.position,
            self.player.direction,
            self.visible_distance,
        );

        if self.mode == Mode::Play && !self.config.raycast.ray_points_mode {
            self.draw_columns(&rays);
        }
        self.draw_map(&rays);

        if self.mode == Mode::Map {
            let (mouse_cell, side) = self.handle_mouse();
            self.draw_map_overlays(mouse_cell, side);
            self.draw_status_text();
        }
    }
}

fn distance_to_height(distance: f32) -> f32 {
    if distance > 0.0 {
        (2.0 / distance).min(1.0)
    } else {
        1.0
    }
}

fn dim_with_distance(color: Color, distance: f32) -> Color {
    let multiplier = if distance > 0.0 {
        (1.0 / distance + 1.0 / 8.0).min(1.0)
    } else {
        1.0
    };
    Color::new(color.r * multiplier, color.g * multiplier, color.b * multiplier, color.a)
}

fn window_conf() -> Conf {
    let config = Config::load();
    Conf {
        window_title: config.window.title.clone(),
        window_width: config.window.width,
        window_height: config.window.height,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = Config::load();
    let enable_edit_log = config.logging.enable_edit_log;
    let edit_log_path = config.logging.edit_log_path.clone();

    let mut sandbox = Sandbox::new(config);

    while sandbox.running {
        sandbox.frame();
        next_frame().await
    }

    if enable_edit_log {
        if let Err(e) = sandbox.edit_log.save_to_file(&edit_log_path) {
            eprintln!("{}", e);
        }
        sandbox.edit_log.print();
        println!("{}", sandbox.edit_log.summary());
    }
}

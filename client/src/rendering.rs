use crate::entity::EntitySnapshot;
use macroquad::prelude::*;
use shared::PlayerId;

const SHIP_LENGTH: f32 = 28.0;
const SHIP_WIDTH: f32 = 18.0;

pub struct Renderer {
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Renderer {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn render(&mut self, entities: &[EntitySnapshot], local_id: PlayerId) {
        clear_background(Color::from_rgba(10, 12, 28, 255));

        for entity in entities {
            let is_local_player = entity.id == local_id;
            self.draw_ship(entity, ship_color(entity.id), is_local_player);
            self.draw_label(entity);
        }

        self.draw_ui(entities.len(), local_id);
    }

    fn draw_ship(&mut self, entity: &EntitySnapshot, color: Color, highlight: bool) {
        let center = vec2(entity.position.x as f32, entity.position.y as f32);
        let [nose, left, right] = ship_vertices(center, entity.position.angle as f32);

        draw_triangle(nose, left, right, color);
        if highlight {
            draw_triangle_lines(nose, left, right, 2.0, WHITE);
        }
    }

    fn draw_label(&mut self, entity: &EntitySnapshot) {
        let x = entity.position.x as f32 - SHIP_LENGTH;
        let y = entity.position.y as f32 + SHIP_LENGTH;
        draw_text(&entity.name, x, y, 16.0, LIGHTGRAY);
    }

    fn draw_ui(&mut self, player_count: usize, local_id: PlayerId) {
        let text = format!("player {} | {} ships", local_id, player_count);
        draw_text(&text, 10.0, 20.0, 18.0, WHITE);
        draw_text(
            "W: thrust  A/D: rotate",
            10.0,
            self.height - 10.0,
            16.0,
            GRAY,
        );
        draw_rectangle_lines(0.0, 0.0, self.width, self.height, 1.0, DARKGRAY);
    }
}

/// Triangle for a ship at `center`, nose pointing along `angle` (0 = up).
fn ship_vertices(center: Vec2, angle: f32) -> [Vec2; 3] {
    let heading = vec2(angle.sin(), -angle.cos());
    let side = vec2(-heading.y, heading.x);

    let nose = center + heading * (SHIP_LENGTH / 2.0);
    let tail = center - heading * (SHIP_LENGTH / 2.0);
    [
        nose,
        tail + side * (SHIP_WIDTH / 2.0),
        tail - side * (SHIP_WIDTH / 2.0),
    ]
}

fn ship_color(id: PlayerId) -> Color {
    match id.0 % 8 {
        0 => WHITE,
        1 => RED,
        2 => GREEN,
        3 => BLUE,
        4 => YELLOW,
        5 => MAGENTA,
        6 => Color::from_rgba(0, 255, 255, 255),
        _ => Color::from_rgba(255, 136, 0, 255),
    }
}

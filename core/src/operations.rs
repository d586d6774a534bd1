use rand::{Rng, RngCore};

use crate::constants::{FONT_ADDRESS, FONT_GLYPH_BYTES, MAX_ADDRESS};
use crate::error::Result;
use crate::keypad::Keypad;
use crate::quirks::Quirks;
use crate::state::State;

/// What the machine should do after an instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Next,
    /// The instruction rewound the program counter and will run again next step.
    AwaitKey,
}

/// The collaborators an instruction may need besides the machine state.
pub struct Context<'a> {
    pub quirks: Quirks,
    pub keypad: &'a dyn Keypad,
    pub rng: &'a mut dyn RngCore,
}

type Outcome = Result<Flow>;

// Every operation runs after the program counter has already been advanced past it.
// Operations that write VF as a flag do so after reading their operands and writing
// their destination, so VF can also be the destination.

/// clear
pub fn clear(state: &mut State) -> Outcome {
    state.frame_buffer.clear();
    Ok(Flow::Next)
}

/// PC = STACK.pop()
pub fn ret(state: &mut State) -> Outcome {
    state.pc = state.stack.pop()?;
    Ok(Flow::Next)
}

/// PC = addr
pub fn jump(state: &mut State, addr: u16) -> Outcome {
    state.pc = addr;
    Ok(Flow::Next)
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Outcome {
    state.stack.push(state.pc)?;
    state.pc = addr;
    Ok(Flow::Next)
}

/// if Vx == nn then pc += 2
pub fn skip_eq_imm(state: &mut State, x: u8, nn: u8) -> Outcome {
    if state.vx(x) == nn {
        state.skip();
    }
    Ok(Flow::Next)
}

/// if Vx != nn then pc += 2
pub fn skip_ne_imm(state: &mut State, x: u8, nn: u8) -> Outcome {
    if state.vx(x) != nn {
        state.skip();
    }
    Ok(Flow::Next)
}

/// if Vx == Vy then pc += 2
pub fn skip_eq_reg(state: &mut State, x: u8, y: u8) -> Outcome {
    if state.vx(x) == state.vx(y) {
        state.skip();
    }
    Ok(Flow::Next)
}

/// if Vx != Vy then pc += 2
pub fn skip_ne_reg(state: &mut State, x: u8, y: u8) -> Outcome {
    if state.vx(x) != state.vx(y) {
        state.skip();
    }
    Ok(Flow::Next)
}

/// Vx = nn
pub fn load_imm(state: &mut State, x: u8, nn: u8) -> Outcome {
    state.set_vx(x, nn);
    Ok(Flow::Next)
}

/// Vx += nn
/// Overflow is dropped and VF is left alone.
pub fn add_imm(state: &mut State, x: u8, nn: u8) -> Outcome {
    state.set_vx(x, state.vx(x).wrapping_add(nn));
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) -> Outcome {
    state.set_vx(x, state.vx(y));
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) -> Outcome {
    state.set_vx(x, state.vx(x) | state.vx(y));
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) -> Outcome {
    state.set_vx(x, state.vx(x) & state.vx(y));
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) -> Outcome {
    state.set_vx(x, state.vx(x) ^ state.vx(y));
    Ok(Flow::Next)
}

/// Vx += Vy; VF = carry
pub fn add_reg(state: &mut State, x: u8, y: u8) -> Outcome {
    let sum = u16::from(state.vx(x)) + u16::from(state.vx(y));
    state.set_vx(x, sum as u8);
    state.set_flag(sum > 0xFF);
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = !borrow
pub fn sub(state: &mut State, x: u8, y: u8) -> Outcome {
    let (vx, vy) = (state.vx(x), state.vx(y));
    state.set_vx(x, vx.wrapping_sub(vy));
    state.set_flag(vx >= vy);
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(state: &mut State, x: u8, y: u8) -> Outcome {
    let (vx, vy) = (state.vx(x), state.vx(y));
    state.set_vx(x, vy.wrapping_sub(vx));
    state.set_flag(vy >= vx);
    Ok(Flow::Next)
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(state: &mut State, x: u8, y: u8, quirks: Quirks) -> Outcome {
    let value = shift_source(state, x, y, quirks);
    state.set_vx(x, value >> 1);
    state.set_flag(value & 0x01 != 0);
    Ok(Flow::Next)
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(state: &mut State, x: u8, y: u8, quirks: Quirks) -> Outcome {
    let value = shift_source(state, x, y, quirks);
    state.set_vx(x, value << 1);
    state.set_flag(value & 0x80 != 0);
    Ok(Flow::Next)
}

fn shift_source(state: &State, x: u8, y: u8, quirks: Quirks) -> u8 {
    if quirks.shift_reads_vy {
        state.vx(y)
    } else {
        state.vx(x)
    }
}

/// I = addr
pub fn load_index(state: &mut State, addr: u16) -> Outcome {
    state.i = addr;
    Ok(Flow::Next)
}

/// PC = V0 + addr
/// With `jump_offset_uses_vx` the offset register is the high nibble of the address.
pub fn jump_offset(state: &mut State, addr: u16, quirks: Quirks) -> Outcome {
    let register = if quirks.jump_offset_uses_vx {
        (addr >> 8) as u8
    } else {
        0x0
    };
    state.pc = addr + u16::from(state.vx(register));
    Ok(Flow::Next)
}

/// Vx = rand_byte & nn
pub fn random(state: &mut State, x: u8, nn: u8, rng: &mut dyn RngCore) -> Outcome {
    let byte: u8 = rng.gen();
    state.set_vx(x, byte & nn);
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n byte sprite at I onto the FrameBuffer at Vx, Vy with wrapping.
/// Sets VF if any pixels were erased.
pub fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Outcome {
    let (column, row) = (state.vx(x) as usize, state.vx(y) as usize);
    let sprite = state.memory.read_slice(state.i, n as usize)?;

    let mut collision = false;
    for (offset, &bits) in sprite.iter().enumerate() {
        collision |= state.frame_buffer.draw_sprite_row(column, row + offset, bits);
    }

    state.set_flag(collision);
    Ok(Flow::Next)
}

/// if Vx.pressed then pc += 2
pub fn skip_key_pressed(state: &mut State, x: u8, keypad: &dyn Keypad) -> Outcome {
    if keypad.is_key_pressed(state.vx(x)) {
        state.skip();
    }
    Ok(Flow::Next)
}

/// if !Vx.pressed then pc += 2
pub fn skip_key_not_pressed(state: &mut State, x: u8, keypad: &dyn Keypad) -> Outcome {
    if !keypad.is_key_pressed(state.vx(x)) {
        state.skip();
    }
    Ok(Flow::Next)
}

/// Vx = DT
pub fn load_delay(state: &mut State, x: u8) -> Outcome {
    state.set_vx(x, state.delay_timer);
    Ok(Flow::Next)
}

/// await keypress for Vx
/// Rather than blocking, the program counter is rewound so this runs again next step.
pub fn wait_key(state: &mut State, x: u8, keypad: &dyn Keypad) -> Outcome {
    match keypad.first_pressed() {
        Some(key) => {
            state.set_vx(x, key);
            Ok(Flow::Next)
        }
        None => {
            state.pc = state.pc.wrapping_sub(2);
            Ok(Flow::AwaitKey)
        }
    }
}

/// DT = Vx
pub fn set_delay(state: &mut State, x: u8) -> Outcome {
    state.delay_timer = state.vx(x);
    Ok(Flow::Next)
}

/// ST = Vx
pub fn set_sound(state: &mut State, x: u8) -> Outcome {
    state.sound_timer = state.vx(x);
    Ok(Flow::Next)
}

/// I += Vx; VF = I > 0xFFF
/// Some programs rely on the flag, see `Quirks::index_overflow_sets_vf`.
pub fn add_index(state: &mut State, x: u8, quirks: Quirks) -> Outcome {
    let sum = u32::from(state.i) + u32::from(state.vx(x));
    state.i = sum as u16;
    if quirks.index_overflow_sets_vf {
        state.set_flag(sum > u32::from(MAX_ADDRESS));
    }
    Ok(Flow::Next)
}

/// I = Vx * 5
/// Set I to the memory address of the font sprite for the digit in Vx
pub fn load_font(state: &mut State, x: u8) -> Outcome {
    state.i = FONT_ADDRESS + u16::from(state.vx(x)) * FONT_GLYPH_BYTES;
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store the hundreds, tens and ones digits of Vx starting at address I
pub fn store_bcd(state: &mut State, x: u8) -> Outcome {
    let value = state.vx(x);
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.memory.write_slice(state.i, &digits)?;
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn store_registers(state: &mut State, x: u8, quirks: Quirks) -> Outcome {
    let count = x as usize + 1;
    state.memory.write_slice(state.i, &state.v[..count])?;
    if quirks.load_store_advances_i {
        state.i = state.i.wrapping_add(count as u16);
    }
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn load_registers(state: &mut State, x: u8, quirks: Quirks) -> Outcome {
    let count = x as usize + 1;
    let bytes = state.memory.read_slice(state.i, count)?;
    state.v[..count].copy_from_slice(bytes);
    if quirks.load_store_advances_i {
        state.i = state.i.wrapping_add(count as u16);
    }
    Ok(Flow::Next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::keypad::Keys;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_add_reg_matches_wide_sum() {
        let mut state = State::new();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                state.v[0x1] = a;
                state.v[0x2] = b;
                add_reg(&mut state, 0x1, 0x2).unwrap();
                let sum = u16::from(a) + u16::from(b);
                assert_eq!(state.v[0x1], (sum % 256) as u8);
                assert_eq!(state.v[0xF], u8::from(sum > 255));
            }
        }
    }

    #[test]
    fn test_sub_flag_is_no_borrow() {
        let mut state = State::new();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                state.v[0x1] = a;
                state.v[0x2] = b;
                sub(&mut state, 0x1, 0x2).unwrap();
                assert_eq!(state.v[0x1], a.wrapping_sub(b));
                assert_eq!(state.v[0xF], u8::from(a >= b));
            }
        }
    }

    #[test]
    fn test_sub_equal_operands_sets_flag() {
        let mut state = State::new();
        state.v[0x1] = 0x42;
        state.v[0x2] = 0x42;
        sub(&mut state, 0x1, 0x2).unwrap();
        assert_eq!(state.v[0x1], 0);
        assert_eq!(state.v[0xF], 1);

        state.v[0x1] = 0x42;
        subn(&mut state, 0x1, 0x2).unwrap();
        assert_eq!(state.v[0xF], 1);
    }

    #[test]
    fn test_flag_wins_when_vf_is_destination() {
        let mut state = State::new();
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x01;
        add_reg(&mut state, 0xF, 0x1).unwrap();
        // 0xFF + 0x01 carries; the flag overwrites the truncated sum
        assert_eq!(state.v[0xF], 1);

        state.v[0xF] = 0x03;
        shr(&mut state, 0xF, 0x0, Quirks::default()).unwrap();
        assert_eq!(state.v[0xF], 1);

        state.v[0xF] = 0x10;
        state.v[0x1] = 0x20;
        sub(&mut state, 0xF, 0x1).unwrap();
        assert_eq!(state.v[0xF], 0);
    }

    #[test]
    fn test_shift_round_trip() {
        let mut state = State::new();
        for value in 0..=255u8 {
            // no bits lost shifting left then right
            if value & 0x80 == 0 {
                state.v[0x3] = value;
                shl(&mut state, 0x3, 0x0, Quirks::default()).unwrap();
                assert_eq!(state.v[0xF], 0);
                shr(&mut state, 0x3, 0x0, Quirks::default()).unwrap();
                assert_eq!(state.v[0x3], value);
                assert_eq!(state.v[0xF], 0);
            }
            // no bits lost shifting right then left
            if value & 0x01 == 0 {
                state.v[0x3] = value;
                shr(&mut state, 0x3, 0x0, Quirks::default()).unwrap();
                shl(&mut state, 0x3, 0x0, Quirks::default()).unwrap();
                assert_eq!(state.v[0x3], value);
            }
        }
    }

    #[test]
    fn test_shift_flag_is_lost_bit() {
        let mut state = State::new();
        state.v[0x3] = 0x81;
        shr(&mut state, 0x3, 0x0, Quirks::default()).unwrap();
        assert_eq!(state.v[0x3], 0x40);
        assert_eq!(state.v[0xF], 1);

        state.v[0x3] = 0x81;
        shl(&mut state, 0x3, 0x0, Quirks::default()).unwrap();
        assert_eq!(state.v[0x3], 0x02);
        assert_eq!(state.v[0xF], 1);
    }

    #[test]
    fn test_shift_reads_vy_quirk() {
        let quirks = Quirks {
            shift_reads_vy: true,
            ..Quirks::default()
        };
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x04;
        shr(&mut state, 0x1, 0x2, quirks).unwrap();
        assert_eq!(state.v[0x1], 0x02);
        assert_eq!(state.v[0x2], 0x04);
        assert_eq!(state.v[0xF], 0);

        shl(&mut state, 0x1, 0x2, quirks).unwrap();
        assert_eq!(state.v[0x1], 0x08);
    }

    #[test]
    fn test_jump_offset_uses_v0() {
        let mut state = State::new();
        state.v[0x0] = 0x02;
        state.v[0xA] = 0x10;
        jump_offset(&mut state, 0xABC, Quirks::default()).unwrap();
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_jump_offset_uses_vx_quirk() {
        let quirks = Quirks {
            jump_offset_uses_vx: true,
            ..Quirks::default()
        };
        let mut state = State::new();
        state.v[0x0] = 0x02;
        state.v[0xA] = 0x10;
        jump_offset(&mut state, 0xABC, quirks).unwrap();
        assert_eq!(state.pc, 0xACC);
    }

    #[test]
    fn test_random_masks_with_nn() {
        let mut state = State::new();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..64 {
            random(&mut state, 0x1, 0x0F, &mut rng).unwrap();
            assert_eq!(state.v[0x1] & 0xF0, 0);
        }
        random(&mut state, 0x1, 0x00, &mut rng).unwrap();
        assert_eq!(state.v[0x1], 0);
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let mut expected = StdRng::seed_from_u64(42);
        let byte: u8 = expected.gen();

        let mut state = State::new();
        let mut rng = StdRng::seed_from_u64(42);
        random(&mut state, 0x5, 0xFF, &mut rng).unwrap();
        assert_eq!(state.v[0x5], byte);
    }

    #[test]
    fn test_draw_twice_restores_and_collides() {
        let mut state = State::new();
        state.v[0x1] = 10;
        state.v[0x2] = 7;
        state.i = 0x5 * 5;
        draw(&mut state, 0x1, 0x2, 5).unwrap();
        let lit = state.frame_buffer.lit_count();
        assert!(lit > 0);
        assert_eq!(state.v[0xF], 0);

        draw(&mut state, 0x1, 0x2, 5).unwrap();
        assert_eq!(state.frame_buffer.lit_count(), 0);
        assert_eq!(state.v[0xF], 1);
    }

    #[test]
    fn test_draw_wraps_rows() {
        let mut state = State::new();
        state.memory.write_slice(0x300, &[0x80, 0x80, 0x80]).unwrap();
        state.i = 0x300;
        state.v[0x0] = 0;
        state.v[0x1] = 31;
        draw(&mut state, 0x0, 0x1, 3).unwrap();
        assert!(state.frame_buffer.is_lit(0, 31));
        assert!(state.frame_buffer.is_lit(0, 0));
        assert!(state.frame_buffer.is_lit(0, 1));
        assert_eq!(state.frame_buffer.lit_count(), 3);
    }

    #[test]
    fn test_draw_wraps_columns() {
        let mut state = State::new();
        state.memory.write(0x300, 0xFF).unwrap();
        state.i = 0x300;
        state.v[0x0] = 60;
        draw(&mut state, 0x0, 0x1, 1).unwrap();
        for x in [60, 61, 62, 63, 0, 1, 2, 3].iter() {
            assert!(state.frame_buffer.is_lit(*x, 0));
        }
        assert_eq!(state.frame_buffer.lit_count(), 8);
    }

    #[test]
    fn test_draw_with_vf_as_coordinate() {
        let mut state = State::new();
        state.memory.write(0x300, 0x80).unwrap();
        state.i = 0x300;
        state.v[0xF] = 5;
        draw(&mut state, 0xF, 0xF, 1).unwrap();
        assert!(state.frame_buffer.is_lit(5, 5));
        assert_eq!(state.v[0xF], 0);
    }

    #[test]
    fn test_draw_out_of_bounds_draws_nothing() {
        let mut state = State::new();
        state.i = 0xFFE;
        state.v[0xF] = 0x7;
        assert!(matches!(
            draw(&mut state, 0x0, 0x0, 4),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(state.frame_buffer.lit_count(), 0);
        assert_eq!(state.v[0xF], 0x7);
    }

    #[test]
    fn test_wait_key_rewinds_without_key() {
        let mut state = State::new();
        state.pc = 0x202;
        let keys = Keys::new();
        assert_eq!(wait_key(&mut state, 0x1, &keys).unwrap(), Flow::AwaitKey);
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_wait_key_stores_key() {
        let mut state = State::new();
        state.pc = 0x202;
        let mut keys = Keys::new();
        keys.press(0xC);
        assert_eq!(wait_key(&mut state, 0x1, &keys).unwrap(), Flow::Next);
        assert_eq!(state.v[0x1], 0xC);
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_add_index_overflow_flag() {
        let mut state = State::new();
        state.i = 0xFFF;
        state.v[0x1] = 0x01;
        add_index(&mut state, 0x1, Quirks::default()).unwrap();
        assert_eq!(state.i, 0x1000);
        assert_eq!(state.v[0xF], 1);

        state.i = 0x100;
        add_index(&mut state, 0x1, Quirks::default()).unwrap();
        assert_eq!(state.i, 0x101);
        assert_eq!(state.v[0xF], 0);
    }

    #[test]
    fn test_add_index_without_overflow_flag() {
        let mut state = State::new();
        state.i = 0xFFF;
        state.v[0x1] = 0x01;
        state.v[0xF] = 0x7;
        add_index(&mut state, 0x1, Quirks::cosmac_vip()).unwrap();
        assert_eq!(state.i, 0x1000);
        assert_eq!(state.v[0xF], 0x7);
    }

    #[test]
    fn test_store_bcd() {
        let mut state = State::new();
        state.v[0x1] = 157;
        state.i = 0x300;
        store_bcd(&mut state, 0x1).unwrap();
        assert_eq!(state.memory.read_slice(0x300, 3).unwrap(), &[1, 5, 7]);

        state.v[0x1] = 7;
        store_bcd(&mut state, 0x1).unwrap();
        assert_eq!(state.memory.read_slice(0x300, 3).unwrap(), &[0, 0, 7]);
    }

    #[test]
    fn test_store_and_load_registers_leave_i() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x4].copy_from_slice(&[0x1, 0x2, 0x3, 0x4]);
        store_registers(&mut state, 0x2, Quirks::default()).unwrap();
        assert_eq!(state.memory.read_slice(0x300, 4).unwrap(), &[0x1, 0x2, 0x3, 0x0]);
        assert_eq!(state.i, 0x300);

        state.v = [0; 16];
        load_registers(&mut state, 0x2, Quirks::default()).unwrap();
        assert_eq!(state.v[0x0..0x4], [0x1, 0x2, 0x3, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_load_store_advances_i_quirk() {
        let mut state = State::new();
        state.i = 0x300;
        store_registers(&mut state, 0x2, Quirks::cosmac_vip()).unwrap();
        assert_eq!(state.i, 0x303);
        load_registers(&mut state, 0xF, Quirks::cosmac_vip()).unwrap();
        assert_eq!(state.i, 0x313);
    }

    #[test]
    fn test_store_registers_out_of_bounds() {
        let mut state = State::new();
        state.i = 0xFFE;
        assert!(matches!(
            store_registers(&mut state, 0x3, Quirks::default()),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_call_overflow_and_ret_underflow() {
        let mut state = State::new();
        for _ in 0..16 {
            call(&mut state, 0x300).unwrap();
        }
        assert!(matches!(
            call(&mut state, 0x300),
            Err(Error::StackOverflow { address: 0x300 })
        ));
        assert_eq!(state.stack.len(), 16);

        let mut state = State::new();
        assert!(matches!(ret(&mut state), Err(Error::StackUnderflow)));
    }
}

mod helpers;
mod normalization;
mod signup_guard;

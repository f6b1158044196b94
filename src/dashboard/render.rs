//! HTML fragments for each dashboard section.
//!
//! Every renderer is a pure function of its payload. Forecast slicing
//! assumes the provider's 3-hour cadence: the first 8 samples cover the
//! next ~24 hours, and every 8th sample from index 7 stands in for a day.

use maud::{html, Markup};

use crate::dashboard::format;
use crate::dashboard::route::DEFAULT_LOCATION;
use crate::models::{
    AirQualitySample, CurrentConditions, ForecastSample, ForecastSeries, LocationMatch,
    WeatherCondition,
};

/// Samples shown in the "Today at" strip.
pub const HOURLY_SLOTS: usize = 8;
/// Index of the first sample used for the daily list.
pub const DAILY_FIRST_INDEX: usize = 7;
/// Samples per day at a 3-hour cadence.
pub const DAILY_STEP: usize = 8;

const ICON_DIR: &str = "./assets/images/weather_icons";

pub fn hourly_slice(list: &[ForecastSample]) -> &[ForecastSample] {
    &list[..list.len().min(HOURLY_SLOTS)]
}

pub fn daily_samples(list: &[ForecastSample]) -> impl Iterator<Item = &ForecastSample> {
    list.iter().skip(DAILY_FIRST_INDEX).step_by(DAILY_STEP)
}

fn primary(weather: &[WeatherCondition]) -> Option<&WeatherCondition> {
    weather.first()
}

fn icon_path(icon: &str) -> String {
    format!("{}/{}.png", ICON_DIR, icon)
}

fn whole(v: f64) -> i64 {
    v.round() as i64
}

pub fn render_current_weather(current: &CurrentConditions) -> Markup {
    let condition = primary(&current.weather);

    html! {
        div class="card card-lg current-weather-card" {
            h2 class="title-2 card-title" { "Now" }
            div class="wrapper" {
                p class="heading" { (whole(current.main.temp)) "°" sup { "c" } }
                @if let Some(c) = condition {
                    img class="weather-icon" src=(icon_path(&c.icon)) width="64" height="64" alt=(c.description);
                }
            }
            @if let Some(c) = condition {
                p class="body-3" { (c.description) }
            }
            ul class="meta-list" {
                li class="meta-item" {
                    p class="title-3 meta-text" { (format::get_date(current.dt, current.timezone)) }
                }
                li class="meta-item" {
                    p class="title-3 meta-text" { (current.name) }
                }
            }
        }
    }
}

pub fn render_highlights(current: &CurrentConditions, air_quality: &AirQualitySample) -> Markup {
    let tz = current.timezone;

    html! {
        div class="card card-lg" {
            h2 class="title-2" { "Todays Highlights" }
            div class="highlight-list" {
                @if let Some(entry) = air_quality.list.first() {
                    div class="card card-sm highlight-card one" {
                        h3 class="title-3" { "Air Quality Index" }
                        ul class="card-list" {
                            li class="card-item" {
                                p class="title-1" { (format!("{:.1}", entry.components.pm2_5)) }
                                p class="label-1" { "PM" sub { "2.5" } }
                            }
                            li class="card-item" {
                                p class="title-1" { (format!("{:.1}", entry.components.so2)) }
                                p class="label-1" { "SO" sub { "2" } }
                            }
                            li class="card-item" {
                                p class="title-1" { (format!("{:.1}", entry.components.no2)) }
                                p class="label-1" { "NO" sub { "2" } }
                            }
                            li class="card-item" {
                                p class="title-1" { (format!("{:.1}", entry.components.o3)) }
                                p class="label-1" { "O" sub { "3" } }
                            }
                        }
                        @if let Some(tier) = format::aqi_level(entry.main.aqi) {
                            span class=(format!("badge aqi-{0} label-{0}", tier.index)) title=(tier.message) {
                                (tier.level)
                            }
                        }
                    }
                }
                div class="card card-sm highlight-card two" {
                    h3 class="title-3" { "Sunrise & Sunset" }
                    div class="card-list" {
                        div class="card-item" {
                            p class="label-1" { "Sunrise" }
                            p class="title-1" { (format::get_time(current.sys.sunrise, tz)) }
                        }
                        div class="card-item" {
                            p class="label-1" { "Sunset" }
                            p class="title-1" { (format::get_time(current.sys.sunset, tz)) }
                        }
                    }
                }
                div class="card card-sm highlight-card" {
                    h3 class="title-3" { "Humidity" }
                    p class="title-1" { (whole(current.main.humidity)) sub { "%" } }
                }
                div class="card card-sm highlight-card" {
                    h3 class="title-3" { "Pressure" }
                    p class="title-1" { (whole(current.main.pressure)) sub { "hPa" } }
                }
                @if let Some(visibility) = current.visibility {
                    div class="card card-sm highlight-card" {
                        h3 class="title-3" { "Visibility" }
                        p class="title-1" { (format!("{:.1}", f64::from(visibility) / 1000.0)) sub { "km" } }
                    }
                }
                div class="card card-sm highlight-card" {
                    h3 class="title-3" { "Feels Like" }
                    p class="title-1" { (whole(current.main.feels_like)) "°" sup { "c" } }
                }
            }
        }
    }
}

pub fn render_hourly(forecast: &ForecastSeries) -> Markup {
    let tz = forecast.city.timezone;
    let samples = hourly_slice(&forecast.list);

    html! {
        h2 class="title-2" { "Today at" }
        div class="slider-container" {
            ul class="slider-list temperature-list" {
                @for sample in samples {
                    li class="slider-item" data-dt=(sample.dt) {
                        div class="card card-sm slider-card" {
                            p class="body-3" { (format::get_hours(sample.dt, tz)) }
                            @if let Some(c) = primary(&sample.weather) {
                                img class="weather-icon" src=(icon_path(&c.icon)) width="48" height="48" loading="lazy" alt=(c.description) title=(c.description);
                            }
                            p class="body-3" { (whole(sample.main.temp)) "°" }
                        }
                    }
                }
            }
            ul class="slider-list wind-list" {
                @for sample in samples {
                    li class="slider-item" {
                        div class="card card-sm slider-card" {
                            p class="body-3" { (format::get_hours(sample.dt, tz)) }
                            img class="weather-icon" src=(icon_path("direction")) width="48" height="48" loading="lazy" alt="direction"
                                style=(format!("transform: rotate({}deg)", sample.wind.deg - 180.0));
                            p class="body-3" { (whole(format::mps_to_kmh(sample.wind.speed))) " km/h" }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_daily(forecast: &ForecastSeries) -> Markup {
    let tz = forecast.city.timezone;

    html! {
        h2 class="title-2" { "5 Days Forecast" }
        div class="card card-lg forecast-card" {
            ul {
                @for sample in daily_samples(&forecast.list) {
                    li class="card-item" data-dt=(sample.dt) {
                        div class="icon-wrapper" {
                            @if let Some(c) = primary(&sample.weather) {
                                img class="weather-icon" src=(icon_path(&c.icon)) width="36" height="36" alt=(c.description) title=(c.description);
                            }
                            span class="span" {
                                p class="title-2" { (whole(sample.main.temp_max)) "°" }
                            }
                        }
                        p class="label-1" { (format::get_day_month(sample.dt, tz)) }
                        p class="label-1" { (format::get_weekday(sample.dt, tz)) }
                    }
                }
            }
        }
    }
}

/// "Montreal, CA" from the closest reverse-geocoding match.
pub fn render_location(matches: &[LocationMatch]) -> Markup {
    html! {
        @match matches.first() {
            Some(place) => { (place.name) ", " (place.country) },
            None => { "Unknown location" },
        }
    }
}

pub fn render_not_found() -> Markup {
    html! {
        section class="error-content" {
            h2 class="heading" { "404" }
            p class="body-1" { "Page not found!" }
            a href=(DEFAULT_LOCATION) class="btn-primary" {
                span class="span" { "Go Home" }
            }
        }
    }
}
